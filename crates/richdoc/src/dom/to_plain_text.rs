// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use super::document::Document;
use super::nodes::Block;

pub trait ToPlainText {
    fn to_plain_text(&self) -> String;
}

impl ToPlainText for Document {
    /// Paragraph text joined by newlines. Images contribute nothing.
    fn to_plain_text(&self) -> String {
        self.blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(paragraph) => Some(paragraph.text()),
                Block::Image(_) => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

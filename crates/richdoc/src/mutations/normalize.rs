// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::{Block, Document, Image, Leaf, Paragraph};

impl Paragraph {
    /// Merge neighbouring leaves with the same marks and drop empty ones.
    /// A paragraph left with nothing gets a single plain empty leaf.
    pub(crate) fn normalize(&mut self) {
        let mut merged: Vec<Leaf> = Vec::with_capacity(self.children.len());
        for leaf in self.children.drain(..) {
            if leaf.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.marks == leaf.marks => {
                    last.text.push_str(&leaf.text)
                }
                _ => merged.push(leaf),
            }
        }
        if merged.is_empty() {
            merged.push(Leaf::default());
        }
        self.children = merged;
    }
}

impl Image {
    pub(crate) fn normalize(&mut self) {
        if self.children.len() != 1 || self.children[0] != Leaf::default() {
            self.children = vec![Leaf::default()];
        }
        if self.alt.as_deref() == Some("") {
            self.alt = None;
        }
    }
}

impl Document {
    pub(crate) fn normalize(&mut self) {
        let blocks = self.blocks_mut();
        if blocks.is_empty() {
            blocks.push(Block::Paragraph(Paragraph::empty()));
        }
        for block in blocks.iter_mut() {
            match block {
                Block::Paragraph(paragraph) => paragraph.normalize(),
                Block::Image(image) => image.normalize(),
            }
        }
    }
}

// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::error::MutationError;
use crate::{Alignment, Block, EditorState};

impl EditorState {
    /// Align every paragraph the selection touches. Images and paragraphs
    /// outside the selection keep their alignment.
    pub fn set_align(&mut self, alignment: Alignment) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        for index in self.selection.blocks() {
            if let Some(Block::Paragraph(paragraph)) =
                self.document.block_mut(index)
            {
                paragraph.align = Some(alignment);
            }
        }
        Ok(())
    }

    /// Alignment of the paragraph holding the start of the selection.
    pub fn alignment_at_cursor(&self) -> Option<Alignment> {
        self.document
            .block(self.selection.start().block)
            .and_then(Block::as_paragraph)
            .and_then(|paragraph| paragraph.align)
    }
}

// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use serde::{Deserialize, Serialize};

use super::marks::Marks;
use super::nodes::{Block, Paragraph};
use crate::selection::Point;

/// The root of the tree: an ordered, never empty, list of blocks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl Document {
    /// Build a document from blocks. An empty list becomes a single
    /// empty paragraph.
    pub fn new(blocks: Vec<Block>) -> Self {
        let mut document = Self { blocks };
        document.normalize();
        document
    }

    pub fn empty() -> Self {
        Self {
            blocks: vec![Block::Paragraph(Paragraph::empty())],
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub(crate) fn blocks_mut(&mut self) -> &mut Vec<Block> {
        &mut self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.blocks.get_mut(index)
    }

    /// Number of blocks. Always at least one.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(Block::as_paragraph)
    }

    /// True for the canonical empty document: one empty paragraph.
    pub fn is_empty(&self) -> bool {
        matches!(
            self.blocks.as_slice(),
            [Block::Paragraph(paragraph)] if paragraph.is_empty()
        )
    }

    /// Marks in effect for text inserted at `point`.
    pub fn marks_at(&self, point: &Point) -> Marks {
        match self.blocks.get(point.block) {
            Some(Block::Paragraph(paragraph)) => {
                paragraph.marks_at(point.offset)
            }
            _ => Marks::default(),
        }
    }
}

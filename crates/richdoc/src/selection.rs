// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Positions and ranges inside a [`Document`].
//!
//! A [`Point`] names a block and a grapheme offset within that block's
//! text. Image blocks only have offset 0. A [`Selection`] is an
//! anchor/focus pair in either direction.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::MutationError;
use crate::Document;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
)]
pub struct Point {
    pub block: usize,
    pub offset: usize,
}

impl Point {
    pub fn new(block: usize, offset: usize) -> Self {
        Self { block, offset }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct Selection {
    pub anchor: Point,
    pub focus: Point,
}

impl Selection {
    pub fn new(anchor: Point, focus: Point) -> Self {
        Self { anchor, focus }
    }

    pub fn caret(block: usize, offset: usize) -> Self {
        let point = Point::new(block, offset);
        Self::new(point, point)
    }

    /// A range inside a single block.
    pub fn within(block: usize, start: usize, end: usize) -> Self {
        Self::new(Point::new(block, start), Point::new(block, end))
    }

    pub fn start(&self) -> Point {
        self.anchor.min(self.focus)
    }

    pub fn end(&self) -> Point {
        self.anchor.max(self.focus)
    }

    pub fn is_collapsed(&self) -> bool {
        self.anchor == self.focus
    }

    /// Indices of every block the selection touches.
    pub fn blocks(&self) -> RangeInclusive<usize> {
        self.start().block..=self.end().block
    }

    /// The covered grapheme range inside block `index`, given that
    /// block's length.
    pub fn range_in(&self, index: usize, len: usize) -> (usize, usize) {
        let start = self.start();
        let end = self.end();
        let from = if index == start.block { start.offset } else { 0 };
        let to = if index == end.block { end.offset } else { len };
        (from.min(len), to.min(len))
    }

    pub fn validate(&self, document: &Document) -> Result<(), MutationError> {
        for point in [self.anchor, self.focus] {
            let valid = document
                .block(point.block)
                .is_some_and(|block| point.offset <= block.len());
            if !valid {
                return Err(MutationError::SelectionOutOfRange {
                    block: point.block,
                    offset: point.offset,
                });
            }
        }
        Ok(())
    }

    /// The nearest valid selection in `document`.
    pub fn clamped(&self, document: &Document) -> Selection {
        let clamp = |point: Point| {
            let block = point.block.min(document.len() - 1);
            let len = document.block(block).map_or(0, |b| b.len());
            Point::new(block, point.offset.min(len))
        };
        Selection::new(clamp(self.anchor), clamp(self.focus))
    }
}

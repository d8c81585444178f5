// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Shape checks that must hold before a document is serialized.

use thiserror::Error;

use super::document::Document;
use super::marks::ValuedMark;
use super::nodes::Block;

pub const MIN_IMAGE_SIZE: u32 = 50;
pub const MAX_IMAGE_SIZE: u32 = 800;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("document has no blocks")]
    NoBlocks,
    #[error("paragraph {block} has no leaves")]
    NoLeaves { block: usize },
    #[error("paragraph {block} has an empty leaf next to other leaves")]
    StrayEmptyLeaf { block: usize },
    #[error("{mark} in block {block} has an unusable value {value:?}")]
    BadStyleValue {
        block: usize,
        mark: ValuedMark,
        value: String,
    },
    #[error("image {block} must have exactly one empty leaf")]
    ImageChildren { block: usize },
    #[error("image {block} has no url")]
    ImageWithoutUrl { block: usize },
    #[error("image {block} size {size} is outside [50, 800]")]
    ImageSize { block: usize, size: u32 },
}

impl Document {
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        if self.blocks().is_empty() {
            return Err(InvariantViolation::NoBlocks);
        }
        for (index, block) in self.blocks().iter().enumerate() {
            match block {
                Block::Paragraph(paragraph) => {
                    if paragraph.children.is_empty() {
                        return Err(InvariantViolation::NoLeaves {
                            block: index,
                        });
                    }
                    if paragraph.children.len() > 1
                        && paragraph.children.iter().any(|l| l.is_empty())
                    {
                        return Err(InvariantViolation::StrayEmptyLeaf {
                            block: index,
                        });
                    }
                    for leaf in &paragraph.children {
                        for (mark, value) in leaf.marks.style_declarations() {
                            if !is_usable_style_value(value) {
                                return Err(InvariantViolation::BadStyleValue {
                                    block: index,
                                    mark,
                                    value: value.to_owned(),
                                });
                            }
                        }
                    }
                }
                Block::Image(image) => {
                    if image.children.len() != 1
                        || !image.children[0].is_empty()
                    {
                        return Err(InvariantViolation::ImageChildren {
                            block: index,
                        });
                    }
                    if image.url.trim().is_empty() {
                        return Err(InvariantViolation::ImageWithoutUrl {
                            block: index,
                        });
                    }
                    for size in image.width.iter().chain(image.height.iter()) {
                        if !(MIN_IMAGE_SIZE..=MAX_IMAGE_SIZE).contains(size) {
                            return Err(InvariantViolation::ImageSize {
                                block: index,
                                size: *size,
                            });
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Panics if the document breaks one of its invariants.
    pub fn explicitly_assert_invariants(&self) {
        if let Err(violation) = self.check_invariants() {
            panic!("Document invariant violated: {violation}\n{self:#?}");
        }
    }

    /// Only checks invariants when the `assert-invariants` feature is on.
    pub fn assert_invariants(&self) {
        #[cfg(feature = "assert-invariants")]
        self.explicitly_assert_invariants();
    }
}

/// A style value can be written into `style="..."` and read back
/// unchanged.
pub(crate) fn is_usable_style_value(value: &str) -> bool {
    !value.is_empty()
        && value.trim() == value
        && !value.contains(|c: char| c == ';' || c.is_control())
}

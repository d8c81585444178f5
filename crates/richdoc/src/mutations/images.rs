// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use url::Url;

use crate::error::MutationError;
use crate::{Block, EditorConfig, EditorState, Image, Point, Selection};

impl EditorState {
    /// Insert an image at the cursor, replacing any selected content. A
    /// paragraph with the cursor in the middle is split around the image.
    /// The image has no explicit size until it is resized.
    pub fn insert_image(
        &mut self,
        url: &str,
        alt: Option<&str>,
    ) -> Result<(), MutationError> {
        let url = url.trim();
        if Url::parse(url).is_err() {
            return Err(MutationError::InvalidImageUrl(url.to_owned()));
        }
        self.selection.validate(&self.document)?;
        self.delete_selection()?;

        let Point { block, offset } = self.selection.start();
        let image = Block::Image(Image::new(url, alt.map(str::to_owned)));
        let tail = match self.document.block_mut(block) {
            Some(Block::Paragraph(paragraph)) => {
                Some(paragraph.split_off(offset))
            }
            _ => None,
        };
        let blocks = self.document.blocks_mut();
        let cursor = match tail {
            // Nothing before the cursor: the image takes the paragraph's
            // place and the paragraph follows it.
            Some(tail) if offset == 0 => {
                blocks[block] = image;
                blocks.insert(block + 1, tail.into());
                Point::new(block + 1, 0)
            }
            Some(tail) => {
                blocks.insert(block + 1, image);
                blocks.insert(block + 2, tail.into());
                Point::new(block + 2, 0)
            }
            None => {
                blocks.insert(block + 1, image);
                Point::new(block + 1, 0)
            }
        };
        self.document.normalize();
        self.selection = Selection::new(cursor, cursor);
        self.pending_marks = self.document.marks_at(&cursor);
        Ok(())
    }

    /// Change an image's width by `delta` pixels, clamped to the
    /// configured bounds. An image without a width starts from the
    /// configured default. The height is left alone.
    pub fn resize_image(
        &mut self,
        block: usize,
        delta: i32,
        config: &EditorConfig,
    ) -> Result<(), MutationError> {
        let image = self.image_mut(block)?;
        let base = image.width.unwrap_or(config.default_image_width);
        image.width =
            Some(config.clamp_image_size(i64::from(base) + i64::from(delta)));
        Ok(())
    }

    /// Set either dimension explicitly. `None` leaves that dimension as
    /// it is.
    pub fn set_image_size(
        &mut self,
        block: usize,
        width: Option<u32>,
        height: Option<u32>,
        config: &EditorConfig,
    ) -> Result<(), MutationError> {
        let image = self.image_mut(block)?;
        if let Some(width) = width {
            image.width = Some(config.clamp_image_size(i64::from(width)));
        }
        if let Some(height) = height {
            image.height = Some(config.clamp_image_size(i64::from(height)));
        }
        Ok(())
    }

    fn image_mut(&mut self, block: usize) -> Result<&mut Image, MutationError> {
        match self.document.block_mut(block) {
            Some(Block::Image(image)) => Ok(image),
            _ => Err(MutationError::NotAnImage(block)),
        }
    }
}

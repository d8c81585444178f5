// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use serde::{Deserialize, Serialize};

use crate::dom::{MAX_IMAGE_SIZE, MIN_IMAGE_SIZE};

/// Limits and defaults for one editor instance. Every field has a
/// default so hosts only need to provide what they change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Largest accepted image upload in bytes.
    pub max_image_bytes: u64,
    /// Accepted image MIME types.
    pub allowed_image_types: Vec<String>,
    /// Pixels added or removed by one resize step in the toolbar.
    pub resize_step: i32,
    /// Width assumed for an image that was never resized.
    pub default_image_width: u32,
    pub min_image_width: u32,
    pub max_image_width: u32,
    /// Stylesheet URL for a font family; `{family}` is replaced with the
    /// url-encoded family name.
    pub font_stylesheet_url: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_image_bytes: 5 * 1024 * 1024,
            allowed_image_types: [
                "image/png",
                "image/jpeg",
                "image/gif",
                "image/webp",
                "image/svg+xml",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            resize_step: 20,
            default_image_width: 300,
            min_image_width: MIN_IMAGE_SIZE,
            max_image_width: MAX_IMAGE_SIZE,
            font_stylesheet_url: String::from(
                "https://fonts.googleapis.com/css2?family={family}&display=swap",
            ),
        }
    }
}

impl EditorConfig {
    /// Clamp a width to the configured bounds, themselves kept inside
    /// the range the document accepts.
    pub fn clamp_image_size(&self, size: i64) -> u32 {
        let min = self.min_image_width.max(MIN_IMAGE_SIZE);
        let max = self.max_image_width.clamp(min, MAX_IMAGE_SIZE);
        size.clamp(i64::from(min), i64::from(max)) as u32
    }
}

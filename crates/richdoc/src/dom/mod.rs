// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

pub mod document;
pub mod invariants;
pub mod marks;
pub mod nodes;
pub mod parser;
pub mod to_html;
pub mod to_plain_text;

pub use document::Document;
pub use invariants::{InvariantViolation, MAX_IMAGE_SIZE, MIN_IMAGE_SIZE};
pub use marks::{MarkFormat, Marks, ValuedMark};
pub use nodes::{Alignment, Block, Image, Leaf, Paragraph};
pub use to_html::ToHtml;
pub use to_plain_text::ToPlainText;

// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! A small rich-text document model: paragraphs of marked text and
//! image blocks, read from and written to a restricted HTML dialect.

mod config;
pub mod dom;
mod editor_model;
mod editor_state;
mod error;
pub mod fonts;
pub mod image_upload;
mod mutations;
mod selection;

pub use crate::config::EditorConfig;
pub use crate::dom::parser::{
    parse, parse_html, parse_with_notes, ParseDegradation,
};
pub use crate::dom::{
    Alignment, Block, Document, Image, InvariantViolation, Leaf, MarkFormat,
    Marks, Paragraph, ToHtml, ToPlainText, ValuedMark, MAX_IMAGE_SIZE,
    MIN_IMAGE_SIZE,
};
pub use crate::editor_model::{ComposeState, EditorModel, EditorUpdate};
pub use crate::editor_state::EditorState;
pub use crate::error::{
    FileReadError, FileValidationError, MutationError, RichDocError,
};
pub use crate::fonts::{FontHost, FontOption, FontStylesheets, LinkId};
pub use crate::image_upload::{
    validate_image_file, ImageBytes, ImageFile, ImageInsertOutcome,
    ImageInsertTicket,
};
pub use crate::selection::{Point, Selection};

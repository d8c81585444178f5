// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use thiserror::Error;

use crate::dom::{InvariantViolation, ValuedMark};

/// A mutation that was refused. The document is left as it was.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MutationError {
    #[error("selection point {block}:{offset} is outside the document")]
    SelectionOutOfRange { block: usize, offset: usize },
    #[error("block {0} is not an image")]
    NotAnImage(usize),
    #[error("{mark} cannot be set to {value:?}")]
    InvalidMarkValue { mark: ValuedMark, value: String },
    #[error("{0:?} is not a valid image url")]
    InvalidImageUrl(String),
    #[error("mutation would break the document: {0}")]
    Invariant(#[from] InvariantViolation),
}

/// Why an image file was refused before reading it.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FileValidationError {
    #[error("{name} is not a supported image type")]
    UnsupportedType { name: String },
    #[error("{name} is {size} bytes, the limit is {max} bytes")]
    TooLarge { name: String, size: u64, max: u64 },
    #[error("{name} is empty")]
    Empty { name: String },
}

/// The host could not read the file contents.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FileReadError {
    #[error("could not read {name}: {reason}")]
    Failed { name: String, reason: String },
    #[error("reading was aborted")]
    Aborted,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RichDocError {
    #[error(transparent)]
    Mutation(#[from] MutationError),
    #[error(transparent)]
    FileValidation(#[from] FileValidationError),
    #[error(transparent)]
    FileRead(#[from] FileReadError),
    #[error("the editor is in the middle of another change")]
    EditorBusy,
}

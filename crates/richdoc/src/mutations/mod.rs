// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Operations that transform an [`EditorState`](crate::EditorState).
//!
//! Each one either succeeds and leaves a normalised document, or returns
//! a [`MutationError`](crate::MutationError) without having touched it.

mod align;
mod format;
mod images;
mod normalize;
mod text;

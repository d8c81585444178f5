// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Turning an uploaded file into an inserted image.
//!
//! The file is validated before anything else happens. Reading it is the
//! host's job and may finish at any later time, so the editor hands out
//! an [`ImageInsertTicket`] that only holds a weak reference to it. When
//! the read completes the image goes in at the *current* cursor, or is
//! thrown away if the editor is gone.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Weak;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};

use crate::editor_model::{ComposeState, EditorShared, EditorUpdate};
use crate::error::{FileReadError, FileValidationError, RichDocError};
use crate::EditorConfig;

/// A file that passed validation and may be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Contents of an image file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageBytes {
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageBytes {
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

fn mime_for(name: &str) -> Option<&'static str> {
    let (_, extension) = name.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Check a file by name and size before it is read.
pub fn validate_image_file(
    name: &str,
    size: u64,
    config: &EditorConfig,
) -> Result<ImageFile, FileValidationError> {
    let mime = mime_for(name)
        .filter(|mime| config.allowed_image_types.iter().any(|a| a == mime))
        .ok_or_else(|| FileValidationError::UnsupportedType {
            name: name.to_owned(),
        })?;
    check_size(name, size, config)?;
    Ok(ImageFile {
        name: name.to_owned(),
        mime: mime.to_owned(),
        size,
    })
}

fn check_size(
    name: &str,
    size: u64,
    config: &EditorConfig,
) -> Result<(), FileValidationError> {
    if size == 0 {
        return Err(FileValidationError::Empty {
            name: name.to_owned(),
        });
    }
    if size > config.max_image_bytes {
        return Err(FileValidationError::TooLarge {
            name: name.to_owned(),
            size,
            max: config.max_image_bytes,
        });
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
pub enum ImageInsertOutcome {
    Inserted(EditorUpdate),
    /// The editor was dropped before the read finished.
    Discarded,
}

/// A pending image insertion.
pub struct ImageInsertTicket {
    editor: Weak<RefCell<EditorShared>>,
    file: ImageFile,
    alt: Option<String>,
}

impl ImageInsertTicket {
    pub(crate) fn new(
        editor: Weak<RefCell<EditorShared>>,
        file: ImageFile,
        alt: Option<String>,
    ) -> Self {
        Self { editor, file, alt }
    }

    pub fn file(&self) -> &ImageFile {
        &self.file
    }

    /// Whether the editor that issued this ticket still exists.
    pub fn is_live(&self) -> bool {
        self.editor.strong_count() > 0
    }

    /// Insert the image once its contents are known.
    ///
    /// Fails with [`RichDocError::EditorBusy`] when called while the
    /// editor is borrowed, e.g. from inside `on_change` or while a
    /// [`document`](crate::EditorModel::document) guard is held. The
    /// ticket is consumed either way, so hosts should complete tickets
    /// from their own event loop.
    pub fn complete(
        self,
        read: Result<Vec<u8>, FileReadError>,
    ) -> Result<ImageInsertOutcome, RichDocError> {
        let Some(editor) = self.editor.upgrade() else {
            debug!(file = %self.file.name, "editor is gone, discarding image");
            return Ok(ImageInsertOutcome::Discarded);
        };
        let bytes = read?;
        let Ok(mut shared) = editor.try_borrow_mut() else {
            warn!(file = %self.file.name, "editor is busy, image not inserted");
            return Err(RichDocError::EditorBusy);
        };
        check_size(&self.file.name, bytes.len() as u64, shared.config())?;
        let url = ImageBytes {
            mime: self.file.mime,
            bytes,
        }
        .to_data_url();
        let alt = self.alt;
        let update = shared.apply(ComposeState::Idle, |state, _| {
            state.insert_image(&url, alt.as_deref())
        })?;
        Ok(ImageInsertOutcome::Inserted(update))
    }

    /// Await the host's read, then [`complete`](Self::complete).
    pub async fn complete_with<F>(
        self,
        read: F,
    ) -> Result<ImageInsertOutcome, RichDocError>
    where
        F: Future<Output = Result<Vec<u8>, FileReadError>>,
    {
        let result = read.await;
        self.complete(result)
    }
}

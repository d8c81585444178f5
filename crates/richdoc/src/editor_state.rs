// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use strum::IntoEnumIterator;

use crate::error::MutationError;
use crate::{Document, MarkFormat, Marks, Selection};

/// Everything a mutation operates on: the document, where the user is,
/// and the marks the next typed text will carry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    pub document: Document,
    pub selection: Selection,
    pub pending_marks: Marks,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Document::empty())
    }
}

impl EditorState {
    /// Cursor at the very start of `document`.
    pub fn new(document: Document) -> Self {
        let selection = Selection::caret(0, 0);
        let pending_marks = document.marks_at(&selection.start());
        Self {
            document,
            selection,
            pending_marks,
        }
    }

    /// Move the selection. Pending marks are reset to what is under the
    /// new selection.
    pub fn select(&mut self, selection: Selection) -> Result<(), MutationError> {
        selection.validate(&self.document)?;
        self.selection = selection;
        self.pending_marks = self.marks_under_selection();
        Ok(())
    }

    /// For a caret: the marks of the text before it. For a range: the
    /// valued marks at its start, and each boolean mark only if every
    /// selected leaf carries it.
    fn marks_under_selection(&self) -> Marks {
        let mut marks = self.document.marks_at(&self.selection.start());
        if !self.selection.is_collapsed() {
            for format in MarkFormat::iter() {
                if let Some(all) = self
                    .document
                    .all_selected(&self.selection, |m| m.has(format))
                {
                    marks.set(format, all);
                }
            }
        }
        marks
    }
}

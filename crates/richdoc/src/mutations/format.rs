// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Character formatting: toggling boolean marks and overwriting valued
//! ones.

use crate::dom::invariants::is_usable_style_value;
use crate::error::MutationError;
use crate::{
    Block, Document, EditorState, Leaf, MarkFormat, Marks, Selection,
    ValuedMark,
};

impl EditorState {
    /// Toggle a boolean mark.
    ///
    /// - **Caret**: flips the mark in the pending state, so the next
    ///   inserted text will (or won't) carry it.
    /// - **Range**: clears the mark if every selected leaf already has
    ///   it, otherwise sets it on the whole range.
    pub fn toggle_mark(&mut self, format: MarkFormat) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        let active = if self.selection.is_collapsed() {
            self.pending_marks.has(format)
        } else {
            self.document
                .all_selected(&self.selection, |marks| marks.has(format))
                .unwrap_or_else(|| self.pending_marks.has(format))
        };
        let on = !active;
        if !self.selection.is_collapsed() {
            self.document
                .update_marks(&self.selection, |marks| marks.set(format, on));
        }
        self.pending_marks.set(format, on);
        Ok(())
    }

    /// Overwrite a valued mark on the selection (or the pending state for
    /// a caret). The value is trimmed; empty values and values containing
    /// `;` are refused.
    pub fn set_mark(
        &mut self,
        mark: ValuedMark,
        value: &str,
    ) -> Result<(), MutationError> {
        let value = value.trim();
        if !is_usable_style_value(value) {
            return Err(MutationError::InvalidMarkValue {
                mark,
                value: value.to_owned(),
            });
        }
        self.apply_value(mark, Some(value.to_owned()))
    }

    /// Remove a valued mark, going back to the inherited default.
    pub fn clear_mark(&mut self, mark: ValuedMark) -> Result<(), MutationError> {
        self.apply_value(mark, None)
    }

    fn apply_value(
        &mut self,
        mark: ValuedMark,
        value: Option<String>,
    ) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        if !self.selection.is_collapsed() {
            self.document.update_marks(&self.selection, |marks| {
                marks.set_value(mark, value.clone())
            });
        }
        self.pending_marks.set_value(mark, value);
        Ok(())
    }
}

impl Document {
    /// The non-empty leaves covered by `selection`, cut at its edges.
    pub fn selected_leaves(&self, selection: &Selection) -> Vec<Leaf> {
        let mut leaves = Vec::new();
        for index in selection.blocks() {
            if let Some(Block::Paragraph(paragraph)) = self.block(index) {
                let (from, to) = selection.range_in(index, paragraph.len());
                if from < to {
                    let (_, middle, _) = paragraph.isolate(from, to);
                    leaves.extend(middle.into_iter().filter(|l| !l.is_empty()));
                }
            }
        }
        leaves
    }

    /// Whether every selected leaf satisfies `predicate`. `None` when the
    /// selection covers no text.
    pub fn all_selected(
        &self,
        selection: &Selection,
        predicate: impl Fn(&Marks) -> bool,
    ) -> Option<bool> {
        let leaves = self.selected_leaves(selection);
        if leaves.is_empty() {
            return None;
        }
        Some(leaves.iter().all(|leaf| predicate(&leaf.marks)))
    }

    /// Apply `update` to the marks of the text covered by `selection`,
    /// splitting leaves at the selection edges.
    pub(crate) fn update_marks(
        &mut self,
        selection: &Selection,
        update: impl Fn(&mut Marks),
    ) {
        for index in selection.blocks() {
            let Some(Block::Paragraph(paragraph)) = self.block_mut(index)
            else {
                continue;
            };
            let (from, to) = selection.range_in(index, paragraph.len());
            if from >= to {
                continue;
            }
            let (mut before, mut middle, after) = paragraph.isolate(from, to);
            for leaf in &mut middle {
                update(&mut leaf.marks);
            }
            before.append(&mut middle);
            before.extend(after);
            paragraph.children = before;
            paragraph.normalize();
        }
    }
}

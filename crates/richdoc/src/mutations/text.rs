// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Typing, deleting and splitting paragraphs.

use crate::dom::nodes::grapheme_len;
use crate::error::MutationError;
use crate::{Block, EditorState, Leaf, Paragraph, Point, Selection};

/// `text` with every line break as `\n` and other control characters
/// except tab removed, so that it reads back from HTML unchanged.
fn typed_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

impl EditorState {
    /// Replace the selection with `text`, carrying the pending marks.
    /// Each `\n` starts a new paragraph.
    pub fn insert_text(&mut self, text: &str) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        self.delete_selection()?;

        let mut point = self.selection.start();
        if let Some(Block::Image(_)) = self.document.block(point.block) {
            point = self.split_at(point);
        }
        let text = typed_text(text);
        for (index, line) in text.split('\n').enumerate() {
            if index > 0 {
                point = self.split_at(point);
            }
            if line.is_empty() {
                continue;
            }
            let marks = self.pending_marks.clone();
            let Some(Block::Paragraph(paragraph)) =
                self.document.block_mut(point.block)
            else {
                continue;
            };
            let (mut before, after) = paragraph.split_leaves(point.offset);
            let mut prefix: String =
                before.iter().map(|leaf| leaf.text.as_str()).collect();
            prefix.push_str(line);
            before.push(Leaf::with_marks(line, marks));
            before.extend(after);
            paragraph.children = before;
            paragraph.normalize();
            point.offset = grapheme_len(&prefix);
        }
        self.selection = Selection::new(point, point);
        Ok(())
    }

    /// Split the paragraph at the cursor, replacing any selection first.
    pub fn enter(&mut self) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        self.delete_selection()?;
        let point = self.split_at(self.selection.start());
        self.selection = Selection::new(point, point);
        Ok(())
    }

    /// Remove the selected content. Paragraphs at either end of a
    /// multi-block selection are joined; images inside it are removed.
    pub fn delete_selection(&mut self) -> Result<(), MutationError> {
        self.selection.validate(&self.document)?;
        if self.selection.is_collapsed() {
            return Ok(());
        }
        let start = self.selection.start();
        let end = self.selection.end();

        if start.block == end.block {
            if let Some(Block::Paragraph(paragraph)) =
                self.document.block_mut(start.block)
            {
                let (mut before, _, after) =
                    paragraph.isolate(start.offset, end.offset);
                before.extend(after);
                paragraph.children = before;
                paragraph.normalize();
            }
            self.selection = Selection::new(start, start);
            return Ok(());
        }

        let blocks = self.document.blocks_mut();
        let removed: Vec<Block> = blocks.drain(start.block..=end.block).collect();
        let head = match removed.first() {
            Some(Block::Paragraph(p)) => Some(Paragraph {
                align: p.align,
                children: p.split_leaves(start.offset).0,
            }),
            _ => None,
        };
        let tail = match removed.last() {
            Some(Block::Paragraph(p)) => Some(Block::Paragraph(Paragraph {
                align: p.align,
                children: p.split_leaves(end.offset).1,
            })),
            // The selection ends just before this image, so it stays.
            Some(image) => Some(image.clone()),
            None => None,
        };
        let (replacement, offset) = match (head, tail) {
            (Some(mut head), Some(Block::Paragraph(tail))) => {
                head.children.extend(tail.children);
                (vec![Block::Paragraph(head)], start.offset)
            }
            (Some(head), tail) => {
                let mut kept = vec![Block::Paragraph(head)];
                kept.extend(tail);
                (kept, start.offset)
            }
            (None, tail) => (tail.into_iter().collect(), 0),
        };
        let rest = blocks.split_off(start.block);
        blocks.extend(replacement);
        blocks.extend(rest);
        self.document.normalize();

        let cursor = Point::new(start.block, offset);
        self.selection = Selection::new(cursor, cursor).clamped(&self.document);
        Ok(())
    }

    /// Split whatever is at `point` and return the start of the new
    /// paragraph. At an image, an empty paragraph is added after it.
    fn split_at(&mut self, point: Point) -> Point {
        let tail = match self.document.block_mut(point.block) {
            Some(Block::Paragraph(paragraph)) => {
                paragraph.split_off(point.offset)
            }
            _ => Paragraph::empty(),
        };
        self.document
            .blocks_mut()
            .insert(point.block + 1, Block::Paragraph(tail));
        Point::new(point.block + 1, 0)
    }
}

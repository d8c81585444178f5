// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use unicode_segmentation::UnicodeSegmentation;

use super::marks::Marks;

/// Number of extended grapheme clusters in `text`. All offsets inside a
/// paragraph are measured in this unit.
pub(crate) fn grapheme_len(text: &str) -> usize {
    text.graphemes(true).count()
}

/// Split `text` after `offset` grapheme clusters. Offsets past the end
/// split at the end.
pub(crate) fn split_graphemes(text: &str, offset: usize) -> (&str, &str) {
    let byte_index = text
        .grapheme_indices(true)
        .nth(offset)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text.split_at(byte_index)
}

/// A run of text sharing identical formatting.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaf {
    pub text: String,
    #[serde(flatten)]
    pub marks: Marks,
}

impl Leaf {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Marks::default(),
        }
    }

    pub fn with_marks(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn len(&self) -> usize {
        grapheme_len(&self.text)
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align: Option<Alignment>,
    pub children: Vec<Leaf>,
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::empty()
    }
}

impl Paragraph {
    pub fn new(children: Vec<Leaf>) -> Self {
        let mut paragraph = Self {
            align: None,
            children,
        };
        paragraph.normalize();
        paragraph
    }

    pub fn empty() -> Self {
        Self {
            align: None,
            children: vec![Leaf::default()],
        }
    }

    pub fn with_align(mut self, align: Option<Alignment>) -> Self {
        self.align = align;
        self
    }

    pub fn text(&self) -> String {
        self.children.iter().map(|leaf| leaf.text.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        grapheme_len(&self.text())
    }

    pub fn is_empty(&self) -> bool {
        self.children.iter().all(Leaf::is_empty)
    }

    /// Split the leaves at `offset`, cutting a leaf in two if the offset
    /// falls inside it. Neither half is normalised.
    pub(crate) fn split_leaves(&self, offset: usize) -> (Vec<Leaf>, Vec<Leaf>) {
        let mut before = Vec::new();
        let mut after = Vec::new();
        let mut remaining = offset;
        for leaf in &self.children {
            if remaining == 0 {
                after.push(leaf.clone());
                continue;
            }
            let len = leaf.len();
            if len <= remaining {
                remaining -= len;
                before.push(leaf.clone());
            } else {
                let (head, tail) = split_graphemes(&leaf.text, remaining);
                before.push(Leaf::with_marks(head, leaf.marks.clone()));
                after.push(Leaf::with_marks(tail, leaf.marks.clone()));
                remaining = 0;
            }
        }
        (before, after)
    }

    /// Split the leaves into those before `start`, those in
    /// `start..end` and those after `end`.
    pub(crate) fn isolate(
        &self,
        start: usize,
        end: usize,
    ) -> (Vec<Leaf>, Vec<Leaf>, Vec<Leaf>) {
        let (before, rest) = self.split_leaves(start);
        let (middle, after) = Paragraph {
            align: self.align,
            children: rest,
        }
        .split_leaves(end.saturating_sub(start));
        (before, middle, after)
    }

    /// Keep the content before `offset` and return the rest as a new
    /// paragraph with the same alignment.
    pub(crate) fn split_off(&mut self, offset: usize) -> Paragraph {
        let (before, after) = self.split_leaves(offset);
        self.children = before;
        self.normalize();
        Paragraph::new(after).with_align(self.align)
    }

    /// The marks that text typed at `offset` would pick up: those of the
    /// grapheme before the offset, or of the first leaf at the start.
    pub fn marks_at(&self, offset: usize) -> Marks {
        let (before, after) = self.split_leaves(offset);
        before
            .iter()
            .rev()
            .chain(after.iter())
            .find(|leaf| !leaf.is_empty())
            .or_else(|| self.children.first())
            .map(|leaf| leaf.marks.clone())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Always a single empty leaf. Never rendered.
    pub children: Vec<Leaf>,
}

impl Image {
    pub fn new(url: impl Into<String>, alt: Option<String>) -> Self {
        Self {
            url: url.into(),
            alt: alt.filter(|alt| !alt.is_empty()),
            width: None,
            height: None,
            children: vec![Leaf::default()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Block {
    Paragraph(Paragraph),
    Image(Image),
}

impl Block {
    /// Length in grapheme clusters. Images have no addressable content.
    pub fn len(&self) -> usize {
        match self {
            Block::Paragraph(paragraph) => paragraph.len(),
            Block::Image(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Block::Paragraph(paragraph) => Some(paragraph),
            Block::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            Block::Image(image) => Some(image),
            Block::Paragraph(_) => None,
        }
    }

    pub fn leaves(&self) -> &[Leaf] {
        match self {
            Block::Paragraph(paragraph) => &paragraph.children,
            Block::Image(image) => &image.children,
        }
    }
}

impl From<Paragraph> for Block {
    fn from(paragraph: Paragraph) -> Self {
        Block::Paragraph(paragraph)
    }
}

impl From<Image> for Block {
    fn from(image: Image) -> Self {
        Block::Image(image)
    }
}

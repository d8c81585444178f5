// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Document → canonical HTML.
//!
//! The output only uses `<p style="text-align:...">`, `<strong>`, `<em>`,
//! `<u>`, `<span style="...">` and `<img>`. Every leaf is written on its
//! own, with bold outermost and underline innermost, and any valued
//! marks wrapped around the whole run in one `<span>`.

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::document::Document;
use super::invariants::InvariantViolation;
use super::nodes::{Block, Image, Leaf, Paragraph};

pub trait ToHtml {
    fn fmt_html(&self, buf: &mut String);

    fn to_html(&self) -> String {
        let mut buf = String::new();
        self.fmt_html(&mut buf);
        buf
    }
}

impl ToHtml for Leaf {
    fn fmt_html(&self, buf: &mut String) {
        let mut inner = encode_text(&self.text).into_owned();
        if self.marks.underline {
            inner = format!("<u>{inner}</u>");
        }
        if self.marks.italic {
            inner = format!("<em>{inner}</em>");
        }
        if self.marks.bold {
            inner = format!("<strong>{inner}</strong>");
        }
        let declarations = self.marks.style_declarations();
        if declarations.is_empty() {
            buf.push_str(&inner);
            return;
        }
        let style = declarations
            .iter()
            .map(|(mark, value)| format!("{}:{value}", mark.css_property()))
            .collect::<Vec<_>>()
            .join(";");
        buf.push_str("<span style=\"");
        buf.push_str(&encode_double_quoted_attribute(&style));
        buf.push_str("\">");
        buf.push_str(&inner);
        buf.push_str("</span>");
    }
}

impl ToHtml for Paragraph {
    fn fmt_html(&self, buf: &mut String) {
        match self.align {
            Some(align) => {
                buf.push_str(&format!("<p style=\"text-align:{align}\">"))
            }
            None => buf.push_str("<p>"),
        }
        for leaf in &self.children {
            leaf.fmt_html(buf);
        }
        buf.push_str("</p>");
    }
}

impl ToHtml for Image {
    fn fmt_html(&self, buf: &mut String) {
        buf.push_str("<img src=\"");
        buf.push_str(&encode_double_quoted_attribute(&self.url));
        buf.push_str("\" alt=\"");
        buf.push_str(&encode_double_quoted_attribute(
            self.alt.as_deref().unwrap_or_default(),
        ));
        buf.push('"');
        let mut sizes = Vec::new();
        if let Some(width) = self.width {
            sizes.push(format!("width:{width}px"));
        }
        if let Some(height) = self.height {
            sizes.push(format!("height:{height}px"));
        }
        if !sizes.is_empty() {
            buf.push_str(&format!(" style=\"{}\"", sizes.join(";")));
        }
        buf.push_str(" />");
    }
}

impl ToHtml for Block {
    fn fmt_html(&self, buf: &mut String) {
        match self {
            Block::Paragraph(paragraph) => paragraph.fmt_html(buf),
            Block::Image(image) => image.fmt_html(buf),
        }
    }
}

impl ToHtml for Document {
    fn fmt_html(&self, buf: &mut String) {
        for block in self.blocks() {
            block.fmt_html(buf);
        }
    }
}

impl Document {
    /// Serialize, refusing to produce HTML for a document that breaks
    /// its invariants.
    pub fn try_to_html(&self) -> Result<String, InvariantViolation> {
        self.check_invariants()?;
        Ok(self.to_html())
    }
}

// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::fmt;

use tracing::debug;

use super::padom_creator::PaDomCreation;
use super::style;
use super::{PaDom, PaDomCreator, PaDomHandle, PaDomNode, PaNodeContainer};
use crate::dom::invariants::{
    is_usable_style_value, MAX_IMAGE_SIZE, MIN_IMAGE_SIZE,
};
use crate::dom::marks::{Marks, ValuedMark};
use crate::dom::nodes::{Alignment, Block, Image, Leaf, Paragraph};
use crate::dom::Document;

/// Elements whose content is never shown.
const DROPPED: &[&str] = &[
    "script", "style", "template", "head", "title", "meta", "link",
    "noscript", "iframe", "object", "svg", "math",
];

/// Elements that are looked through without comment.
const TRANSPARENT: &[&str] = &["html", "body", "span", "font"];

/// Elements that start a new paragraph.
const BLOCKS: &[&str] = &[
    "p", "div", "h1", "h2", "h3", "h4", "h5", "h6", "li", "dt", "dd",
    "blockquote", "pre", "ul", "ol", "dl", "table", "thead", "tbody",
    "tfoot", "tr", "td", "th", "caption", "section", "article", "header",
    "footer", "nav", "aside", "main", "figure", "figcaption", "address",
    "hr",
];

/// Something in the input that was dropped or simplified. Parsing carries
/// on regardless.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseDegradation {
    /// Tag not in the canonical vocabulary; its text was kept.
    UnsupportedTag(String),
    /// Tag dropped together with its content.
    DroppedElement(String),
    /// Inline style property with no mark equivalent.
    UnsupportedStyle(String),
    /// `text-align` value we do not know.
    UnknownAlignment(String),
    /// `<img>` with no usable `src`.
    ImageWithoutSource,
    /// An image dimension outside the allowed range was clamped.
    ImageSizeClamped(u32),
    /// Malformed markup that html5ever recovered from.
    Markup(String),
}

impl fmt::Display for ParseDegradation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedTag(tag) => {
                write!(formatter, "Tag `{tag}` is not supported, kept its text")
            }
            Self::DroppedElement(tag) => {
                write!(formatter, "Dropped `{tag}` and its content")
            }
            Self::UnsupportedStyle(property) => {
                write!(formatter, "Style `{property}` is not supported")
            }
            Self::UnknownAlignment(value) => {
                write!(formatter, "Unknown text alignment `{value}`")
            }
            Self::ImageWithoutSource => {
                write!(formatter, "Dropped an image without a source")
            }
            Self::ImageSizeClamped(size) => {
                write!(formatter, "Image size {size} clamped to [50, 800]")
            }
            Self::Markup(msg) => write!(formatter, "Malformed markup: {msg}"),
        }
    }
}

/// Parse canonical (or arbitrary) HTML. `None` and empty input give the
/// empty document.
pub fn parse(html: Option<&str>) -> Document {
    match html {
        Some(html) => parse_html(html),
        None => Document::empty(),
    }
}

pub fn parse_html(html: &str) -> Document {
    parse_with_notes(html).0
}

/// Parse, also returning everything that was lost on the way.
pub fn parse_with_notes(html: &str) -> (Document, Vec<ParseDegradation>) {
    if html.trim().is_empty() {
        return (Document::empty(), Vec::new());
    }
    let PaDomCreation { dom, parse_errors } = PaDomCreator::parse(html);
    let mut parser = HtmlParser::new(&dom);
    parser
        .notes
        .extend(parse_errors.into_iter().map(ParseDegradation::Markup));
    let document = parser.run();
    for note in &parser.notes {
        debug!(%note, "html parse degradation");
    }
    (document, parser.notes)
}

/// Formatting inherited from enclosing elements.
#[derive(Clone, Default)]
struct Context {
    marks: Marks,
    align: Option<Alignment>,
}

struct HtmlParser<'a> {
    dom: &'a PaDom,
    blocks: Vec<Block>,
    current: Option<Paragraph>,
    found_block: bool,
    notes: Vec<ParseDegradation>,
}

/// Why a paragraph is being closed. A paragraph interrupted by a nested
/// block before it got any visible content is dropped; one that ends on
/// its own or at a `<br>` is kept even if empty.
#[derive(PartialEq)]
enum Close {
    Interrupted,
    Ended,
}

impl<'a> HtmlParser<'a> {
    fn new(dom: &'a PaDom) -> Self {
        Self {
            dom,
            blocks: Vec::new(),
            current: None,
            found_block: false,
            notes: Vec::new(),
        }
    }

    fn run(&mut self) -> Document {
        let root = self.dom.document_handle().clone();
        self.walk_children(&root, &Context::default());
        self.close_paragraph(Close::Ended);

        if !self.found_block {
            let text = self.dom.text_content(&root, &|c: &PaNodeContainer| {
                DROPPED.contains(&c.local_name())
            });
            let leaves = vec![Leaf::new(text.replace('\r', "\n"))];
            return Document::new(vec![Paragraph::new(leaves).into()]);
        }
        Document::new(std::mem::take(&mut self.blocks))
    }

    fn walk_children(&mut self, handle: &PaDomHandle, context: &Context) {
        let dom = self.dom;
        for child in dom.children(handle) {
            match dom.get_node(child) {
                PaDomNode::Text(text) => {
                    self.push_text(&text.content, context)
                }
                PaDomNode::Container(container) => {
                    self.walk_element(child, container, context)
                }
                PaDomNode::Document(_) | PaDomNode::Ignored => {}
            }
        }
    }

    fn walk_element(
        &mut self,
        handle: &PaDomHandle,
        container: &PaNodeContainer,
        context: &Context,
    ) {
        let tag = container.local_name();
        if DROPPED.contains(&tag) {
            self.notes.push(ParseDegradation::DroppedElement(tag.to_owned()));
            return;
        }
        match tag {
            "br" => {
                self.found_block = true;
                if self.current.is_some() {
                    self.close_paragraph(Close::Ended);
                } else {
                    self.blocks.push(
                        Paragraph::empty().with_align(context.align).into(),
                    );
                }
            }
            "img" => {
                self.found_block = true;
                self.close_paragraph(Close::Interrupted);
                if let Some(image) = self.new_image(container) {
                    self.blocks.push(image.into());
                }
            }
            _ if BLOCKS.contains(&tag) => {
                self.found_block = true;
                self.close_paragraph(Close::Interrupted);
                let mut inner = self.inline_context(container, context);
                inner.align = self.alignment(container).or(context.align);
                self.current = Some(Paragraph {
                    align: inner.align,
                    children: Vec::new(),
                });
                self.walk_children(handle, &inner);
                self.close_paragraph(Close::Ended);
            }
            _ => {
                let inner = self.inline_context(container, context);
                self.walk_children(handle, &inner);
            }
        }
    }

    /// Apply the marks contributed by an inline element and its style.
    fn inline_context(
        &mut self,
        container: &PaNodeContainer,
        context: &Context,
    ) -> Context {
        let mut inner = context.clone();
        let tag = container.local_name();
        match tag {
            "strong" | "b" => inner.marks.bold = true,
            "em" | "i" => inner.marks.italic = true,
            "u" | "ins" => inner.marks.underline = true,
            _ if TRANSPARENT.contains(&tag) || BLOCKS.contains(&tag) => {}
            _ => self
                .notes
                .push(ParseDegradation::UnsupportedTag(tag.to_owned())),
        }
        for (property, value) in container.style() {
            if let Some(mark) = ValuedMark::from_css_property(&property) {
                if is_usable_style_value(&value) {
                    inner.marks.set_value(mark, Some(value));
                } else {
                    self.notes
                        .push(ParseDegradation::UnsupportedStyle(property));
                }
                continue;
            }
            match property.as_str() {
                "font-weight" => {
                    inner.marks.bold = style::is_bold_weight(&value)
                }
                "font-style" => {
                    inner.marks.italic =
                        value.eq_ignore_ascii_case("italic")
                            || value.eq_ignore_ascii_case("oblique")
                }
                "text-decoration" | "text-decoration-line" => {
                    inner.marks.underline =
                        value.to_ascii_lowercase().contains("underline")
                }
                "text-align" => {}
                _ => self
                    .notes
                    .push(ParseDegradation::UnsupportedStyle(property)),
            }
        }
        inner
    }

    fn alignment(&mut self, container: &PaNodeContainer) -> Option<Alignment> {
        let value = container
            .style_value("text-align")
            .or_else(|| container.get_attr("align").map(str::to_owned))?;
        match value.parse::<Alignment>() {
            Ok(align) => Some(align),
            Err(_) => {
                self.notes.push(ParseDegradation::UnknownAlignment(value));
                None
            }
        }
    }

    fn new_image(&mut self, container: &PaNodeContainer) -> Option<Image> {
        let src = container.get_attr("src").map(str::trim).unwrap_or("");
        if src.is_empty() {
            self.notes.push(ParseDegradation::ImageWithoutSource);
            return None;
        }
        let alt = container.get_attr("alt").map(str::to_owned);
        let mut image = Image::new(src, alt);
        image.width = self.dimension(container, "width");
        image.height = self.dimension(container, "height");
        Some(image)
    }

    /// Image size from inline style, falling back to the attribute.
    fn dimension(
        &mut self,
        container: &PaNodeContainer,
        name: &str,
    ) -> Option<u32> {
        let size = container
            .style_value(name)
            .as_deref()
            .and_then(style::pixels)
            .or_else(|| container.get_attr(name).and_then(style::pixels))?;
        let clamped = size.clamp(MIN_IMAGE_SIZE, MAX_IMAGE_SIZE);
        if clamped != size {
            self.notes.push(ParseDegradation::ImageSizeClamped(size));
        }
        Some(clamped)
    }

    fn push_text(&mut self, text: &str, context: &Context) {
        // A carriage return only survives as a character reference, and
        // would read back as a line feed once serialized
        let text = &text.replace('\r', "\n");
        if self.current.is_none() {
            // Whitespace between blocks is formatting, not content
            if text.trim().is_empty() {
                return;
            }
            self.current = Some(Paragraph {
                align: context.align,
                children: Vec::new(),
            });
        }
        if let Some(paragraph) = self.current.as_mut() {
            match paragraph.children.last_mut() {
                Some(last) if last.marks == context.marks => {
                    last.text.push_str(text)
                }
                _ => paragraph
                    .children
                    .push(Leaf::with_marks(text, context.marks.clone())),
            }
        }
    }

    fn close_paragraph(&mut self, how: Close) {
        if let Some(mut paragraph) = self.current.take() {
            if how == Close::Interrupted && paragraph.text().trim().is_empty()
            {
                return;
            }
            paragraph.normalize();
            self.blocks.push(paragraph.into());
        }
    }
}

#[cfg(test)]
mod test {
    use indoc::indoc;
    use speculoos::{assert_that, AssertionFailure, Spec};

    use super::*;
    use crate::dom::to_html::ToHtml;

    trait Roundtrips<T> {
        fn roundtrips(&self);
    }

    impl<T> Roundtrips<T> for Spec<'_, T>
    where
        T: AsRef<str>,
    {
        fn roundtrips(&self) {
            let subject = self.subject.as_ref();
            let document = parse_html(subject);

            // After parsing all our invariants should be satisifed
            document.explicitly_assert_invariants();

            let output = document.to_html();
            if output != subject {
                AssertionFailure::from_spec(self)
                    .with_expected(String::from(subject))
                    .with_actual(output)
                    .fail();
            }
        }
    }

    fn leaf(text: &str, f: impl FnOnce(&mut Marks)) -> Leaf {
        let mut marks = Marks::default();
        f(&mut marks);
        Leaf::with_marks(text, marks)
    }

    #[test]
    fn parse_empty_and_missing_input() {
        assert_eq!(parse(None), Document::empty());
        assert_eq!(parse(Some("")), Document::empty());
        assert_eq!(parse(Some("   ")), Document::empty());
    }

    #[test]
    fn parse_bold_then_plain() {
        let document = parse_html("<p><strong>Hello</strong> world</p>");
        assert_eq!(
            document,
            Document::new(vec![Paragraph::new(vec![
                leaf("Hello", |m| m.bold = true),
                Leaf::new(" world"),
            ])
            .into()])
        );
    }

    #[test]
    fn canonical_html_roundtrips() {
        assert_that!("<p><strong>Hello</strong> world</p>").roundtrips();
        assert_that!("<p></p>").roundtrips();
        assert_that!("<p style=\"text-align:center\">mid</p><p>x</p>")
            .roundtrips();
        assert_that!("<p><strong><em><u>all</u></em></strong></p>")
            .roundtrips();
        assert_that!(
            "<p><span style=\"color:red;background-color:#eee;font-size:14px;\
             font-family:Arial\"><em>styled</em></span></p>"
        )
        .roundtrips();
        assert_that!(
            "<p>a</p><img src=\"data:image/png;base64,AA==\" alt=\"pic\" \
             style=\"width:320px\" /><p>b</p>"
        )
        .roundtrips();
        assert_that!("<p>1 &lt; 2 &amp;&amp; {{date}}</p>").roundtrips();
    }

    #[test]
    fn synonyms_are_canonicalised() {
        let document = parse_html("<p><b>x</b><i>y</i></p>");
        assert_eq!(
            document.to_html(),
            "<p><strong>x</strong><em>y</em></p>"
        );
    }

    #[test]
    fn span_style_applies_to_nested_leaves() {
        let document = parse_html(
            "<p><span style=\"color: blue\">a<strong>b</strong></span></p>",
        );
        let Block::Paragraph(paragraph) = &document.blocks()[0] else {
            panic!("expected a paragraph");
        };
        assert_eq!(
            paragraph.children,
            vec![
                leaf("a", |m| m.color = Some("blue".into())),
                leaf("b", |m| {
                    m.color = Some("blue".into());
                    m.bold = true;
                }),
            ]
        );
    }

    #[test]
    fn inner_style_overrides_outer() {
        let document = parse_html(
            "<p><span style=\"color:red\"><span style=\"color:green\">\
             x</span></span></p>",
        );
        assert_eq!(
            document.to_html(),
            "<p><span style=\"color:green\">x</span></p>"
        );
    }

    #[test]
    fn style_values_with_control_characters_are_dropped() {
        let (document, notes) = parse_with_notes(
            "<p><span style=\"color:red;font-family:Open\tSans\">x</span></p>",
        );
        assert_eq!(
            document.to_html(),
            "<p><span style=\"color:red\">x</span></p>"
        );
        assert!(notes.contains(&ParseDegradation::UnsupportedStyle(
            "font-family".into()
        )));
        assert_eq!(document.check_invariants(), Ok(()));
    }

    #[test]
    fn carriage_return_references_read_as_line_feeds() {
        let document = parse_html("<p>a&#13;b</p>");
        assert_eq!(document.to_html(), "<p>a\nb</p>");
        assert_that!(document.to_html().as_str()).roundtrips();
    }

    #[test]
    fn br_splits_paragraphs() {
        let document = parse_html("<p style=\"text-align:right\">a<br>b</p>");
        assert_eq!(
            document.to_html(),
            "<p style=\"text-align:right\">a</p><p style=\"text-align:right\">b</p>"
        );
    }

    #[test]
    fn top_level_br_is_an_empty_paragraph() {
        let document = parse_html("<p>a</p><br><p>b</p>");
        assert_eq!(document.to_html(), "<p>a</p><p></p><p>b</p>");
        assert_eq!(parse_html("<p><br></p>").to_html(), "<p></p>");
    }

    #[test]
    fn text_without_blocks_becomes_one_plain_leaf() {
        let document = parse_html("Hello <strong>bold</strong> world");
        assert_eq!(
            document,
            Document::new(vec![Paragraph::new(vec![Leaf::new(
                "Hello bold world"
            )])
            .into()])
        );
    }

    #[test]
    fn image_inside_paragraph_splits_it() {
        let document =
            parse_html("<p>before<img src=\"a.png\" alt=\"\">after</p>");
        assert_eq!(
            document.to_html(),
            "<p>before</p><img src=\"a.png\" alt=\"\" /><p>after</p>"
        );
        assert_eq!(document.blocks()[1].as_image().unwrap().alt, None);
    }

    #[test]
    fn image_sizes_are_recovered_and_clamped() {
        let (document, notes) = parse_with_notes(
            "<img src=\"a.png\" style=\"width: 1200px\" height=\"10\">",
        );
        let image = document.blocks()[0].as_image().unwrap();
        assert_eq!(image.width, Some(800));
        assert_eq!(image.height, Some(50));
        assert!(notes.contains(&ParseDegradation::ImageSizeClamped(1200)));
    }

    #[test]
    fn image_without_source_is_dropped() {
        let (document, notes) = parse_with_notes("<p>x</p><img alt=\"a\">");
        assert_eq!(document.to_html(), "<p>x</p>");
        assert!(notes.contains(&ParseDegradation::ImageWithoutSource));
    }

    #[test]
    fn unsupported_tags_degrade_to_text() {
        let (document, notes) = parse_with_notes(
            "<p><a href=\"https://x.test\">link</a> and <del>gone</del></p>",
        );
        assert_eq!(document.to_html(), "<p>link and gone</p>");
        assert!(notes.contains(&ParseDegradation::UnsupportedTag("a".into())));
    }

    #[test]
    fn scripts_are_dropped_entirely() {
        let (document, notes) =
            parse_with_notes("<p>safe</p><script>alert(1)</script>");
        assert_eq!(document.to_html(), "<p>safe</p>");
        assert!(
            notes.contains(&ParseDegradation::DroppedElement("script".into()))
        );
    }

    #[test]
    fn nested_blocks_do_not_leave_empty_paragraphs() {
        let html = indoc! {"
            <div>
              <p>one</p>
              <ul><li>two</li><li><b>three</b></li></ul>
            </div>
        "};
        let document = parse_html(html);
        assert_eq!(
            document.to_html(),
            "<p>one</p><p>two</p><p><strong>three</strong></p>"
        );
    }

    #[test]
    fn css_formatting_properties_become_marks() {
        let document = parse_html(
            "<p><span style=\"font-weight:700;font-style:italic;\
             text-decoration:underline\">x</span></p>",
        );
        assert_eq!(
            document.to_html(),
            "<p><strong><em><u>x</u></em></strong></p>"
        );
    }

    #[test]
    fn unknown_alignment_is_ignored() {
        let (document, notes) =
            parse_with_notes("<p style=\"text-align:start\">x</p>");
        assert_eq!(document.to_html(), "<p>x</p>");
        assert!(
            notes.contains(&ParseDegradation::UnknownAlignment("start".into()))
        );
    }

    #[test]
    fn legacy_align_attribute_is_read() {
        assert_eq!(
            parse_html("<p align=\"justify\">x</p>").to_html(),
            "<p style=\"text-align:justify\">x</p>"
        );
    }
}

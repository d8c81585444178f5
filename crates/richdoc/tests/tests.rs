// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::block_on;
use indoc::indoc;
use richdoc::{
    parse, parse_html, Alignment, Block, Document, EditorConfig, EditorModel,
    EditorState, FileReadError, FontHost, ImageInsertOutcome, Leaf, LinkId,
    MarkFormat, Marks, MutationError, Paragraph, Point, RichDocError,
    Selection, ToHtml, ValuedMark,
};
use serde_json::json;

fn model_with_log(
    initial: Option<&str>,
) -> (EditorModel, Rc<RefCell<Vec<String>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let model = EditorModel::new(initial, EditorConfig::default(), move |html| {
        sink.borrow_mut().push(html.to_owned())
    });
    (model, log)
}

fn assert_roundtrips(model: &EditorModel) {
    let html = model.get_content_as_html();
    let reparsed = parse_html(&html);
    assert_eq!(reparsed, *model.document(), "for {html}");
    assert_eq!(reparsed.to_html(), html);
}

#[test]
fn hello_world_parses_and_serializes() {
    let html = "<p><strong>Hello</strong> world</p>";
    let bold = Marks {
        bold: true,
        ..Default::default()
    };
    let document = parse(Some(html));
    assert_eq!(
        document,
        Document::new(vec![Block::Paragraph(Paragraph::new(vec![
            Leaf::with_marks("Hello", bold),
            Leaf::new(" world"),
        ]))])
    );
    assert_eq!(document.to_html(), html);
}

#[test]
fn missing_and_empty_input_give_one_empty_paragraph() {
    let expected = Document::new(vec![Block::Paragraph(Paragraph::empty())]);
    assert_eq!(parse(None), expected);
    assert_eq!(parse(Some("")), expected);
    assert_eq!(
        serde_json::to_value(&expected).unwrap(),
        json!([{ "type": "paragraph", "children": [{ "text": "" }] }])
    );
}

#[test]
fn documents_built_by_editing_roundtrip() {
    let (mut model, _) = model_with_log(None);
    model.insert_text("Hello world").unwrap();
    assert_roundtrips(&model);

    model.select(Selection::within(0, 0, 5)).unwrap();
    model.toggle_mark(MarkFormat::Bold).unwrap();
    assert_roundtrips(&model);

    model.select(Selection::within(0, 6, 11)).unwrap();
    model.set_mark(ValuedMark::Color, "#c00").unwrap();
    model.set_mark(ValuedMark::FontFamily, "Open Sans").unwrap();
    model.toggle_mark(MarkFormat::Underline).unwrap();
    assert_roundtrips(&model);

    model.select(Selection::caret(0, 11)).unwrap();
    model.enter().unwrap();
    model.insert_text("1 < 2 & {{date}}\nthird").unwrap();
    assert_roundtrips(&model);

    model
        .select(Selection::new(Point::new(0, 2), Point::new(1, 1)))
        .unwrap();
    model.set_align(Alignment::Justify).unwrap();
    assert_roundtrips(&model);

    model.select(Selection::caret(1, 4)).unwrap();
    model
        .insert_image("data:image/png;base64,AQID", Some("a \"quoted\" alt"))
        .unwrap();
    model.resize_image(2, 3).unwrap();
    model.set_image_size(2, None, Some(120)).unwrap();
    assert_roundtrips(&model);

    model.select(Selection::within(0, 3, 8)).unwrap();
    model.delete_selection().unwrap();
    assert_roundtrips(&model);
}

#[test]
fn typed_control_characters_roundtrip() {
    for typed in ["a\rb", "a\0b", "a\r\n\u{b}b\tc"] {
        let (mut model, _) = model_with_log(None);
        model.insert_text(typed).unwrap();
        assert_roundtrips(&model);
    }
}

#[test]
fn style_values_that_cannot_be_read_back_are_refused() {
    let (mut model, log) = model_with_log(Some("<p>abc</p>"));
    model.select(Selection::within(0, 0, 3)).unwrap();
    assert_eq!(
        model.set_mark(ValuedMark::FontFamily, "Open\nSans"),
        Err(MutationError::InvalidMarkValue {
            mark: ValuedMark::FontFamily,
            value: "Open\nSans".into()
        })
    );
    assert!(log.borrow().is_empty());
    model.set_mark(ValuedMark::FontFamily, "Open Sans").unwrap();
    assert_roundtrips(&model);
}

#[test]
fn edited_content_has_the_expected_html() {
    let (mut model, log) = model_with_log(Some("<p>Hello world</p>"));
    model.select(Selection::within(0, 6, 11)).unwrap();
    model.toggle_mark(MarkFormat::Italic).unwrap();
    model.set_mark(ValuedMark::FontSize, "18px").unwrap();
    model.select(Selection::caret(0, 0)).unwrap();
    model.set_align(Alignment::Center).unwrap();

    let expected = indoc! {r#"
        <p style="text-align:center">Hello <span style="font-size:18px"><em>world</em></span></p>"#};
    assert_eq!(model.get_content_as_html(), expected);
    assert_eq!(log.borrow().len(), 3);
    assert_eq!(log.borrow().last().map(String::as_str), Some(expected));
}

#[test]
fn toggling_a_mark_twice_restores_the_selection() {
    let (mut model, _) = model_with_log(Some("<p>Hello <u>world</u></p>"));
    model.select(Selection::within(0, 0, 11)).unwrap();
    model.toggle_mark(MarkFormat::Bold).unwrap();
    assert_eq!(
        model.get_content_as_html(),
        "<p><strong>Hello </strong><strong><u>world</u></strong></p>"
    );
    model.toggle_mark(MarkFormat::Bold).unwrap();
    assert_eq!(model.get_content_as_html(), "<p>Hello <u>world</u></p>");
}

#[test]
fn alignment_only_touches_selected_paragraphs() {
    let (mut model, _) = model_with_log(Some(indoc! {r#"
        <p>a</p><p>b</p><p>c</p><p style="text-align:right">d</p>"#}));
    model
        .select(Selection::new(Point::new(1, 0), Point::new(2, 1)))
        .unwrap();
    model.set_align(Alignment::Center).unwrap();

    let aligns = model
        .document()
        .paragraphs()
        .map(|p| p.align)
        .collect::<Vec<_>>();
    assert_eq!(
        aligns,
        vec![
            None,
            Some(Alignment::Center),
            Some(Alignment::Center),
            Some(Alignment::Right)
        ]
    );
}

#[test]
fn resizing_an_unsized_image_starts_from_the_default_width() {
    let config = EditorConfig::default();
    let mut state = EditorState::default();
    state.insert_image("data:image/png;base64,AQID", None).unwrap();

    state.resize_image(0, 20, &config).unwrap();
    assert_eq!(image_width(&state.document, 0), Some(320));
    state.resize_image(0, 20, &config).unwrap();
    assert_eq!(image_width(&state.document, 0), Some(340));
    let image = state.document.block(0).and_then(|block| block.as_image());
    assert_eq!(image.and_then(|image| image.height), None);
}

#[test]
fn resizing_is_clamped() {
    let config = EditorConfig::default();
    let mut state = EditorState::new(parse_html(
        r#"<img src="cat.png" alt="" style="width:300px" />"#,
    ));
    state.resize_image(0, -1000, &config).unwrap();
    assert_eq!(image_width(&state.document, 0), Some(50));
    state.resize_image(0, 5000, &config).unwrap();
    assert_eq!(image_width(&state.document, 0), Some(800));
}

fn image_width(document: &Document, block: usize) -> Option<u32> {
    document
        .block(block)
        .and_then(|block| block.as_image())
        .and_then(|image| image.width)
}

#[test]
fn refused_mutations_leave_everything_alone() {
    let (mut model, log) = model_with_log(Some("<p>abc</p>"));
    assert_eq!(
        model.insert_image("not a url", None),
        Err(MutationError::InvalidImageUrl("not a url".into()))
    );
    assert!(matches!(
        model.select(Selection::caret(4, 0)),
        Err(MutationError::SelectionOutOfRange { block: 4, offset: 0 })
    ));
    assert!(model.set_mark(ValuedMark::Color, "red;x").is_err());
    assert!(log.borrow().is_empty());
    assert_eq!(model.get_content_as_html(), "<p>abc</p>");
}

#[test]
fn unsupported_markup_keeps_its_text() {
    let document = parse_html(indoc! {r#"
        <div><h1>Title</h1><script>alert(1)</script>
        <table><tr><td>cell</td></tr></table></div>"#});
    assert_eq!(document.to_html(), "<p>Title</p><p>cell</p>");
}

#[test]
fn image_read_applies_to_the_document_at_completion() {
    let (mut model, log) = model_with_log(Some("<p>ab</p>"));
    let (sender, receiver) = oneshot::channel();
    let ticket = model.begin_image_insert("cat.gif", 3, None).unwrap();
    let read =
        async move { receiver.await.unwrap_or(Err(FileReadError::Aborted)) };

    // Edits made while the file is being read are kept
    model.select(Selection::caret(0, 2)).unwrap();
    model.insert_text("c").unwrap();
    sender.send(Ok(vec![1, 2, 3])).unwrap();

    let outcome = block_on(ticket.complete_with(read)).unwrap();
    assert!(matches!(outcome, ImageInsertOutcome::Inserted(_)));
    assert_eq!(
        model.get_content_as_html(),
        "<p>abc</p><img src=\"data:image/gif;base64,AQID\" alt=\"\" /><p></p>"
    );
    assert_eq!(log.borrow().len(), 2);
}

#[test]
fn aborted_reads_are_reported() {
    let (model, log) = model_with_log(None);
    let (sender, receiver) =
        oneshot::channel::<Result<Vec<u8>, FileReadError>>();
    let ticket = model.begin_image_insert("cat.webp", 3, None).unwrap();
    drop(sender);
    let read =
        async move { receiver.await.unwrap_or(Err(FileReadError::Aborted)) };

    assert_eq!(
        block_on(ticket.complete_with(read)),
        Err(RichDocError::FileRead(FileReadError::Aborted))
    );
    assert!(log.borrow().is_empty());
}

#[test]
fn reads_finishing_after_teardown_are_discarded() {
    let (model, log) = model_with_log(None);
    let ticket = model.begin_image_insert("cat.png", 3, None).unwrap();
    assert!(ticket.is_live());
    drop(model);

    let outcome = block_on(ticket.complete_with(async { Ok(vec![1, 2, 3]) }));
    assert_eq!(outcome, Ok(ImageInsertOutcome::Discarded));
    assert!(log.borrow().is_empty());
}

#[test]
fn oversized_reads_are_refused() {
    let (model, _) = model_with_log(None);
    let config = EditorConfig::default();
    let ticket = model.begin_image_insert("cat.png", 3, None).unwrap();
    let bytes = vec![0; config.max_image_bytes as usize + 1];
    assert!(matches!(
        ticket.complete(Ok(bytes)),
        Err(RichDocError::FileValidation(_))
    ));
    assert_eq!(model.get_content_as_html(), "<p></p>");
}

#[derive(Default)]
struct Head {
    next: Cell<u64>,
    links: RefCell<Vec<(LinkId, String)>>,
}

impl FontHost for Head {
    fn add_stylesheet(&self, href: &str) -> LinkId {
        let id = LinkId(self.next.get());
        self.next.set(id.0 + 1);
        self.links.borrow_mut().push((id, href.to_owned()));
        id
    }

    fn remove_stylesheet(&self, id: LinkId) {
        self.links.borrow_mut().retain(|(link, _)| *link != id);
    }
}

#[test]
fn each_editor_removes_only_its_own_font_links() {
    let head = Rc::new(Head::default());
    let (mut first, _) = model_with_log(None);
    let (mut second, _) = model_with_log(None);
    first.mount_fonts(vec!["Roboto".into()], head.clone());
    second.mount_fonts(
        serde_json::from_value(json!([
            { "label": "Sans", "value": "Open Sans" },
            "Roboto"
        ]))
        .unwrap(),
        head.clone(),
    );
    assert_eq!(head.links.borrow().len(), 3);
    assert_eq!(second.fonts()[0].label(), "Sans");

    drop(first);
    let remaining = head
        .links
        .borrow()
        .iter()
        .map(|(_, href)| href.clone())
        .collect::<Vec<_>>();
    assert_eq!(
        remaining,
        vec![
            "https://fonts.googleapis.com/css2?family=Open+Sans&display=swap",
            "https://fonts.googleapis.com/css2?family=Roboto&display=swap",
        ]
    );

    drop(second);
    assert!(head.links.borrow().is_empty());
}

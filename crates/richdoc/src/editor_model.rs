// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::error::{FileValidationError, MutationError};
use crate::fonts::{FontHost, FontOption, FontStylesheets, LinkId};
use crate::image_upload::{validate_image_file, ImageInsertTicket};
use crate::{
    parse, parse_html, Alignment, Document, EditorConfig, EditorState,
    MarkFormat, Marks, Selection, ToHtml, ToPlainText, ValuedMark,
};

/// How the host should group changes for undo. Typing moves the editor
/// into `Composing`; anything else returns it to `Idle`. Either way every
/// change is reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ComposeState {
    #[default]
    Idle,
    Composing,
}

/// The result of one applied change, as passed to `on_change`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorUpdate {
    pub html: String,
    pub selection: Selection,
}

pub(crate) struct EditorShared {
    state: EditorState,
    config: EditorConfig,
    compose: ComposeState,
    on_change: Box<dyn FnMut(&str)>,
}

impl EditorShared {
    pub(crate) fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Run `op` on a copy of the current state and commit it only if the
    /// result serializes cleanly. `on_change` is called exactly once for a
    /// committed change and never for a refused one.
    pub(crate) fn apply<F>(
        &mut self,
        compose: ComposeState,
        op: F,
    ) -> Result<EditorUpdate, MutationError>
    where
        F: FnOnce(&mut EditorState, &EditorConfig) -> Result<(), MutationError>,
    {
        let mut next = self.state.clone();
        if let Err(error) = op(&mut next, &self.config) {
            debug!(%error, "mutation refused");
            return Err(error);
        }
        next.document.normalize();
        next.selection = next.selection.clamped(&next.document);
        next.document.assert_invariants();

        let html = next.document.try_to_html().map_err(|violation| {
            warn!(%violation, "mutation left the document invalid");
            violation
        })?;

        self.state = next;
        self.compose = compose;
        trace!(%html, "content changed");
        (self.on_change)(&html);
        Ok(EditorUpdate {
            html,
            selection: self.state.selection,
        })
    }
}

/// One editor instance. It owns its document exclusively; every change
/// goes through here and ends with a single `on_change` call carrying the
/// new HTML.
///
/// `on_change` runs while the editor is borrowed, so it must not call
/// back into the same editor.
pub struct EditorModel {
    shared: Rc<RefCell<EditorShared>>,
    fonts: Vec<FontOption>,
    // Dropped with the editor, which removes the links again.
    stylesheets: Option<FontStylesheets>,
}

impl EditorModel {
    /// Start from `initial` HTML, or an empty document for `None`.
    /// Construction does not call `on_change`.
    pub fn new(
        initial: Option<&str>,
        config: EditorConfig,
        on_change: impl FnMut(&str) + 'static,
    ) -> Self {
        let state = EditorState::new(parse(initial));
        Self {
            shared: Rc::new(RefCell::new(EditorShared {
                state,
                config,
                compose: ComposeState::Idle,
                on_change: Box::new(on_change),
            })),
            fonts: Vec::new(),
            stylesheets: None,
        }
    }

    /// Offer `fonts` in the toolbar and link their stylesheets through
    /// `host` until the editor is dropped or fonts are mounted again.
    pub fn mount_fonts(
        &mut self,
        fonts: Vec<FontOption>,
        host: Rc<dyn FontHost>,
    ) {
        // Release the old links before adding new ones
        self.stylesheets = None;
        let template = self.shared.borrow().config.font_stylesheet_url.clone();
        self.stylesheets =
            Some(FontStylesheets::acquire(host, &fonts, &template));
        self.fonts = fonts;
    }

    pub fn fonts(&self) -> &[FontOption] {
        &self.fonts
    }

    /// Stylesheet links currently held for the mounted fonts.
    pub fn font_links(&self) -> &[LinkId] {
        match &self.stylesheets {
            Some(stylesheets) => stylesheets.links(),
            None => &[],
        }
    }

    pub fn document(&self) -> Ref<'_, Document> {
        Ref::map(self.shared.borrow(), |shared| &shared.state.document)
    }

    pub fn selection(&self) -> Selection {
        self.shared.borrow().state.selection
    }

    pub fn compose_state(&self) -> ComposeState {
        self.shared.borrow().compose
    }

    /// Marks the next typed text will carry, for toolbar state.
    pub fn active_marks(&self) -> Marks {
        self.shared.borrow().state.pending_marks.clone()
    }

    pub fn alignment_at_cursor(&self) -> Option<Alignment> {
        self.shared.borrow().state.alignment_at_cursor()
    }

    pub fn get_content_as_html(&self) -> String {
        self.shared.borrow().state.document.to_html()
    }

    pub fn get_content_as_plain_text(&self) -> String {
        self.shared.borrow().state.document.to_plain_text()
    }

    /// Move the selection. The content is unchanged so nothing is
    /// reported, but composing ends.
    pub fn select(&mut self, selection: Selection) -> Result<(), MutationError> {
        let mut shared = self.shared.borrow_mut();
        shared.state.select(selection)?;
        shared.compose = ComposeState::Idle;
        Ok(())
    }

    pub fn blur(&mut self) {
        self.shared.borrow_mut().compose = ComposeState::Idle;
    }

    fn apply<F>(
        &mut self,
        compose: ComposeState,
        op: F,
    ) -> Result<EditorUpdate, MutationError>
    where
        F: FnOnce(&mut EditorState, &EditorConfig) -> Result<(), MutationError>,
    {
        self.shared.borrow_mut().apply(compose, op)
    }

    pub fn toggle_mark(
        &mut self,
        format: MarkFormat,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| state.toggle_mark(format))
    }

    pub fn set_mark(
        &mut self,
        mark: ValuedMark,
        value: &str,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| state.set_mark(mark, value))
    }

    pub fn clear_mark(
        &mut self,
        mark: ValuedMark,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| state.clear_mark(mark))
    }

    pub fn set_align(
        &mut self,
        alignment: Alignment,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| state.set_align(alignment))
    }

    pub fn insert_image(
        &mut self,
        url: &str,
        alt: Option<&str>,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| state.insert_image(url, alt))
    }

    /// Grow or shrink the image in `block` by `steps` toolbar steps.
    pub fn resize_image(
        &mut self,
        block: usize,
        steps: i32,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, config| {
            let delta = steps.saturating_mul(config.resize_step);
            state.resize_image(block, delta, config)
        })
    }

    pub fn set_image_size(
        &mut self,
        block: usize,
        width: Option<u32>,
        height: Option<u32>,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, config| {
            state.set_image_size(block, width, height, config)
        })
    }

    pub fn insert_text(
        &mut self,
        text: &str,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Composing, |state, _| state.insert_text(text))
    }

    pub fn delete_selection(&mut self) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Composing, |state, _| state.delete_selection())
    }

    pub fn enter(&mut self) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Composing, |state, _| state.enter())
    }

    /// Replace the whole document. The cursor goes to the start.
    pub fn set_content_from_html(
        &mut self,
        html: &str,
    ) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| {
            *state = EditorState::new(parse_html(html));
            Ok(())
        })
    }

    pub fn clear(&mut self) -> Result<EditorUpdate, MutationError> {
        self.apply(ComposeState::Idle, |state, _| {
            *state = EditorState::default();
            Ok(())
        })
    }

    /// Validate an image file and hand out a ticket for inserting it once
    /// the host has read it. Nothing changes until the ticket completes.
    pub fn begin_image_insert(
        &self,
        name: &str,
        size: u64,
        alt: Option<&str>,
    ) -> Result<ImageInsertTicket, FileValidationError> {
        let file = validate_image_file(name, size, &self.shared.borrow().config)
            .inspect_err(|error| debug!(%error, "image file refused"))?;
        Ok(ImageInsertTicket::new(
            Rc::downgrade(&self.shared),
            file,
            alt.map(str::to_owned),
        ))
    }
}

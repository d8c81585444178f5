// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use std::borrow::Cow;
use std::cell::{Ref, RefCell};

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{parse_fragment, Attribute, QualName};

use super::padom::paqual_name;
use super::{PaDom, PaDomHandle, PaDomNode, PaNodeContainer, PaNodeText};

/// The arena DOM plus whatever html5ever complained about on the way.
/// html5ever recovers from every error, so these are informational.
pub(crate) struct PaDomCreation {
    pub(crate) dom: PaDom,
    pub(crate) parse_errors: Vec<String>,
}

pub(crate) struct PaDomCreator {
    state: RefCell<PaDomCreation>,
}

impl PaDomCreator {
    /// Parse `html` as the content of a `<body>`. Never fails.
    pub fn parse(html: &str) -> PaDomCreation {
        parse_fragment(
            PaDomCreator::default(),
            Default::default(),
            paqual_name("body"),
            vec![],
        )
        .from_utf8()
        .one(html.as_bytes())
    }
}

impl Default for PaDomCreator {
    fn default() -> Self {
        Self {
            state: RefCell::new(PaDomCreation {
                dom: PaDom::new(),
                parse_errors: Vec::new(),
            }),
        }
    }
}

impl PaDomCreator {
    fn append_text_to(dom: &mut PaDom, parent: &PaDomHandle, text: &str) {
        let last_text = match dom.children(parent).last() {
            Some(last) if matches!(dom.get_node(last), PaDomNode::Text(_)) => {
                Some(last.clone())
            }
            _ => None,
        };
        match last_text {
            Some(handle) => {
                if let PaDomNode::Text(t) = dom.get_mut_node(&handle) {
                    t.content += text;
                }
            }
            None => {
                let handle = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: text.to_owned(),
                }));
                dom.push_child(parent, handle);
            }
        }
    }
}

impl TreeSink for PaDomCreator {
    type Handle = PaDomHandle;
    type Output = PaDomCreation;
    type ElemName<'a> = Ref<'a, QualName>;

    fn finish(self) -> Self::Output {
        self.state.into_inner()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        self.state.borrow_mut().parse_errors.push(String::from(msg));
    }

    fn get_document(&self) -> Self::Handle {
        self.state.borrow().dom.document_handle().clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        Ref::map(self.state.borrow(), |state| state.dom.name(target))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let dom = &mut self.state.borrow_mut().dom;
        let attrs = attrs
            .into_iter()
            .map(|attr| {
                (attr.name.local.as_ref().to_owned(), attr.value.to_string())
            })
            .collect();
        let mut container = PaNodeContainer::new(name, attrs);
        if flags.template {
            container.template_contents =
                Some(dom.add_node(PaDomNode::Document(PaNodeContainer::new(
                    paqual_name(""),
                    Vec::new(),
                ))));
        }
        dom.add_node(PaDomNode::Container(container))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn create_pi(
        &self,
        _target: StrTendril,
        _data: StrTendril,
    ) -> Self::Handle {
        self.state.borrow_mut().dom.add_node(PaDomNode::Ignored)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let dom = &mut self.state.borrow_mut().dom;
        match child {
            NodeOrText::AppendNode(child) => {
                dom.detach(&child);
                dom.push_child(parent, child);
            }
            NodeOrText::AppendText(tendril) => {
                Self::append_text_to(dom, parent, tendril.as_ref());
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        let has_parent = self.state.borrow().dom.parent(element).is_some();
        if has_parent {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctypes carry nothing we keep
    }

    fn pop(&self, _node: &Self::Handle) {}

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        match self.state.borrow().dom.get_node(target) {
            PaDomNode::Container(PaNodeContainer {
                template_contents: Some(contents),
                ..
            }) => contents.clone(),
            _ => target.clone(),
        }
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(
        &self,
        sibling: &Self::Handle,
        new_node: NodeOrText<Self::Handle>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        match new_node {
            NodeOrText::AppendNode(node) => {
                dom.detach(&node);
                dom.insert_before(sibling, node);
            }
            NodeOrText::AppendText(tendril) => {
                let handle = dom.add_node(PaDomNode::Text(PaNodeText {
                    content: tendril.as_ref().to_owned(),
                }));
                dom.insert_before(sibling, handle);
            }
        }
    }

    fn add_attrs_if_missing(
        &self,
        target: &Self::Handle,
        attrs: Vec<Attribute>,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        if let PaDomNode::Container(node) = dom.get_mut_node(target) {
            for attr in attrs {
                let name = attr.name.local.as_ref();
                if !node.has_attr(name) {
                    node.attrs.push((name.to_owned(), attr.value.to_string()));
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.state.borrow_mut().dom.detach(target);
    }

    fn reparent_children(
        &self,
        node: &Self::Handle,
        new_parent: &Self::Handle,
    ) {
        let dom = &mut self.state.borrow_mut().dom;
        for child in dom.take_children(node) {
            dom.push_child(new_parent, child);
        }
    }

    fn set_current_line(&self, _line_number: u64) {}
}

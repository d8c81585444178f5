// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::{namespace_url, ns, LocalName, QualName};

use super::PaNodeContainer;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct PaDomHandle(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeText {
    pub(crate) content: String,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum PaDomNode {
    Document(PaNodeContainer),
    Container(PaNodeContainer),
    Text(PaNodeText),
    /// Comments, processing instructions and doctypes. Kept so that
    /// html5ever gets a handle back, never converted.
    Ignored,
}

impl PaDomNode {
    fn children(&self) -> Option<&Vec<PaDomHandle>> {
        match self {
            PaDomNode::Document(c) | PaDomNode::Container(c) => {
                Some(&c.children)
            }
            PaDomNode::Text(_) | PaDomNode::Ignored => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<PaDomHandle>> {
        match self {
            PaDomNode::Document(c) | PaDomNode::Container(c) => {
                Some(&mut c.children)
            }
            PaDomNode::Text(_) | PaDomNode::Ignored => None,
        }
    }
}

pub(crate) fn paqual_name(local: &str) -> QualName {
    QualName::new(None, ns!(html), LocalName::from(local))
}

/// Arena of nodes created while html5ever runs. Nodes that were detached
/// during tree construction stay in the arena but are unreachable from
/// the document node.
#[derive(Clone, Debug)]
pub(crate) struct PaDom {
    nodes: Vec<PaDomNode>,
    // Indexed like `nodes`.
    parents: Vec<Option<PaDomHandle>>,
    document_handle: PaDomHandle,
    unnamed: QualName,
}

impl PaDom {
    pub(crate) fn new() -> Self {
        Self {
            nodes: vec![PaDomNode::Document(PaNodeContainer::new(
                paqual_name(""),
                Vec::new(),
            ))],
            parents: vec![None],
            document_handle: PaDomHandle(0),
            unnamed: paqual_name(""),
        }
    }

    pub(crate) fn document_handle(&self) -> &PaDomHandle {
        &self.document_handle
    }

    pub(crate) fn add_node(&mut self, node: PaDomNode) -> PaDomHandle {
        self.nodes.push(node);
        self.parents.push(None);
        PaDomHandle(self.nodes.len() - 1)
    }

    pub(crate) fn get_node(&self, handle: &PaDomHandle) -> &PaDomNode {
        &self.nodes[handle.0]
    }

    pub(crate) fn get_mut_node(
        &mut self,
        handle: &PaDomHandle,
    ) -> &mut PaDomNode {
        &mut self.nodes[handle.0]
    }

    /// Element name of a node. Non-element nodes report an empty name.
    pub(crate) fn name(&self, handle: &PaDomHandle) -> &QualName {
        match self.get_node(handle) {
            PaDomNode::Container(c) | PaDomNode::Document(c) => &c.name,
            PaDomNode::Text(_) | PaDomNode::Ignored => &self.unnamed,
        }
    }

    pub(crate) fn children(&self, handle: &PaDomHandle) -> &[PaDomHandle] {
        self.get_node(handle)
            .children()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(crate) fn parent(
        &self,
        child: &PaDomHandle,
    ) -> Option<&PaDomHandle> {
        self.parents[child.0].as_ref()
    }

    /// Remove `child` from whichever node currently holds it.
    pub(crate) fn detach(&mut self, child: &PaDomHandle) {
        if let Some(parent) = self.parents[child.0].take() {
            if let Some(children) = self.nodes[parent.0].children_mut() {
                children.retain(|h| h != child);
            }
        }
    }

    pub(crate) fn push_child(
        &mut self,
        parent: &PaDomHandle,
        child: PaDomHandle,
    ) {
        if let Some(children) = self.nodes[parent.0].children_mut() {
            self.parents[child.0] = Some(parent.clone());
            children.push(child);
        }
    }

    pub(crate) fn insert_before(
        &mut self,
        sibling: &PaDomHandle,
        child: PaDomHandle,
    ) {
        let Some(parent) = self.parent(sibling).cloned() else {
            return;
        };
        if let Some(children) = self.nodes[parent.0].children_mut() {
            let index = children
                .iter()
                .position(|h| h == sibling)
                .unwrap_or(children.len());
            self.parents[child.0] = Some(parent);
            children.insert(index, child);
        }
    }

    pub(crate) fn take_children(
        &mut self,
        handle: &PaDomHandle,
    ) -> Vec<PaDomHandle> {
        let children = self
            .get_mut_node(handle)
            .children_mut()
            .map(std::mem::take)
            .unwrap_or_default();
        for child in &children {
            self.parents[child.0] = None;
        }
        children
    }

    /// Text content of the subtree, skipping `skip`ped elements.
    pub(crate) fn text_content(
        &self,
        handle: &PaDomHandle,
        skip: &dyn Fn(&PaNodeContainer) -> bool,
    ) -> String {
        let mut text = String::new();
        self.collect_text(handle, skip, &mut text);
        text
    }

    fn collect_text(
        &self,
        handle: &PaDomHandle,
        skip: &dyn Fn(&PaNodeContainer) -> bool,
        out: &mut String,
    ) {
        match self.get_node(handle) {
            PaDomNode::Text(text) => out.push_str(&text.content),
            PaDomNode::Container(c) if skip(c) => {}
            PaDomNode::Container(c) | PaDomNode::Document(c) => {
                for child in &c.children {
                    self.collect_text(child, skip, out);
                }
            }
            PaDomNode::Ignored => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn container(dom: &mut PaDom, name: &str) -> PaDomHandle {
        dom.add_node(PaDomNode::Container(PaNodeContainer::new(
            paqual_name(name),
            Vec::new(),
        )))
    }

    #[test]
    fn detach_and_insert_before_keep_order() {
        let mut dom = PaDom::new();
        let doc = dom.document_handle().clone();
        let a = container(&mut dom, "a");
        let b = container(&mut dom, "b");
        let c = container(&mut dom, "c");
        dom.push_child(&doc, a.clone());
        dom.push_child(&doc, b.clone());
        dom.insert_before(&b, c.clone());
        assert_eq!(dom.children(&doc), &[a.clone(), c.clone(), b.clone()]);
        assert_eq!(dom.parent(&c), Some(&doc));
        dom.detach(&c);
        assert_eq!(dom.children(&doc), &[a, b]);
        assert_eq!(dom.parent(&c), None);
    }

    #[test]
    fn parents_follow_moved_children() {
        let mut dom = PaDom::new();
        let doc = dom.document_handle().clone();
        let old = container(&mut dom, "old");
        let new = container(&mut dom, "new");
        let child = container(&mut dom, "child");
        dom.push_child(&doc, old.clone());
        dom.push_child(&doc, new.clone());
        dom.push_child(&old, child.clone());

        for moved in dom.take_children(&old) {
            assert_eq!(dom.parent(&moved), None);
            dom.push_child(&new, moved);
        }
        assert_eq!(dom.parent(&child), Some(&new));
        assert!(dom.children(&old).is_empty());

        // Detaching from the new parent leaves the old one alone
        dom.detach(&child);
        assert!(dom.children(&new).is_empty());
        assert_eq!(dom.children(&doc), &[old, new]);
    }

    #[test]
    fn text_content_skips_filtered_elements() {
        let mut dom = PaDom::new();
        let doc = dom.document_handle().clone();
        let script = container(&mut dom, "script");
        let hidden = dom.add_node(PaDomNode::Text(PaNodeText {
            content: "hidden".into(),
        }));
        let shown = dom.add_node(PaDomNode::Text(PaNodeText {
            content: "shown".into(),
        }));
        dom.push_child(&script, hidden);
        dom.push_child(&doc, script);
        dom.push_child(&doc, shown);
        let text =
            dom.text_content(&doc, &|c: &PaNodeContainer| c.local_name() == "script");
        assert_eq!(text, "shown");
    }
}

// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use html5ever::QualName;

use super::style;
use super::PaDomHandle;

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaNodeContainer {
    pub(crate) name: QualName,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<PaDomHandle>,
    /// Contents fragment of a `<template>` element.
    pub(crate) template_contents: Option<PaDomHandle>,
}

impl PaNodeContainer {
    pub(crate) fn new(name: QualName, attrs: Vec<(String, String)>) -> Self {
        Self {
            name,
            attrs,
            children: Vec::new(),
            template_contents: None,
        }
    }

    pub(crate) fn local_name(&self) -> &str {
        self.name.local.as_ref()
    }

    pub(crate) fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _v)| n == name)
            .map(|(_n, v)| v.as_str())
    }

    pub(crate) fn has_attr(&self, name: &str) -> bool {
        self.get_attr(name).is_some()
    }

    /// Declarations of the `style` attribute, empty if there is none.
    pub(crate) fn style(&self) -> Vec<(String, String)> {
        self.get_attr("style")
            .map(style::declarations)
            .unwrap_or_default()
    }

    pub(crate) fn style_value(&self, property: &str) -> Option<String> {
        self.style()
            .into_iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dom::parser::padom::paqual_name;

    #[test]
    fn style_value_takes_the_last_declaration() {
        let node = PaNodeContainer::new(
            paqual_name("span"),
            vec![("style".into(), "color:red;color: blue".into())],
        );
        assert_eq!(node.style_value("color"), Some("blue".to_owned()));
        assert_eq!(node.style_value("font-size"), None);
        assert_eq!(node.local_name(), "span");
    }
}

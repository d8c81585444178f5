// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! The font list offered to the user, and the stylesheet links that make
//! those fonts available while an editor is mounted.

use std::collections::HashSet;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// One entry of the host-supplied font list: either a bare family name
/// or a label shown in the toolbar with the family it stands for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FontOption {
    Labeled { label: String, value: String },
    Name(String),
}

impl FontOption {
    /// The `font-family` value this option applies.
    pub fn value(&self) -> &str {
        match self {
            Self::Labeled { value, .. } => value,
            Self::Name(name) => name,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Labeled { label, .. } => label,
            Self::Name(name) => name,
        }
    }
}

impl From<&str> for FontOption {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LinkId(pub u64);

/// Where stylesheet links live, typically the page `<head>`.
pub trait FontHost {
    fn add_stylesheet(&self, href: &str) -> LinkId;
    fn remove_stylesheet(&self, id: LinkId);
}

/// Stylesheet links owned by one editor. Every link added on
/// [`acquire`](Self::acquire) is removed again when this is dropped.
pub struct FontStylesheets {
    host: Rc<dyn FontHost>,
    links: Vec<LinkId>,
}

impl FontStylesheets {
    pub fn acquire(
        host: Rc<dyn FontHost>,
        fonts: &[FontOption],
        url_template: &str,
    ) -> Self {
        let mut seen = HashSet::new();
        let links = fonts
            .iter()
            .map(|font| font.value().trim())
            .filter(|family| !family.is_empty() && seen.insert(*family))
            .map(|family| {
                host.add_stylesheet(&stylesheet_url(url_template, family))
            })
            .collect::<Vec<_>>();
        debug!(count = links.len(), "font stylesheets added");
        Self { host, links }
    }

    pub fn links(&self) -> &[LinkId] {
        &self.links
    }
}

impl Drop for FontStylesheets {
    fn drop(&mut self) {
        for id in self.links.drain(..) {
            self.host.remove_stylesheet(id);
        }
        debug!("font stylesheets removed");
    }
}

/// Fill `{family}` in `template` with the url-encoded family name.
pub fn stylesheet_url(template: &str, family: &str) -> String {
    let encoded: String =
        url::form_urlencoded::byte_serialize(family.as_bytes()).collect();
    template.replace("{family}", &encoded)
}

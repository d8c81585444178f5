// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Reading inline `style` attributes.

use once_cell::sync::Lazy;
use regex::Regex;

static DECLARATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z-]+)\s*:\s*(.*?)\s*$")
        .expect("declaration regex is valid")
});

static PIXELS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d+)(?:\.\d+)?\s*(?:px)?$").expect("pixels regex is valid")
});

/// Split a style attribute into `(property, value)` pairs. Properties are
/// lower-cased, values trimmed, and declarations without a value dropped.
pub(crate) fn declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let captures = DECLARATION.captures(decl)?;
            let value = captures[2].to_owned();
            if value.is_empty() {
                return None;
            }
            Some((captures[1].to_ascii_lowercase(), value))
        })
        .collect()
}

/// Parse `320`, `320px` or `320.5px` into whole pixels.
pub(crate) fn pixels(value: &str) -> Option<u32> {
    let captures = PIXELS.captures(value.trim())?;
    captures[1].parse().ok()
}

pub(crate) fn is_bold_weight(value: &str) -> bool {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => true,
        other => other.parse::<u32>().is_ok_and(|weight| weight >= 600),
    }
}

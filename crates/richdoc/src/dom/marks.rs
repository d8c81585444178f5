// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Character-level formatting carried by a [`Leaf`](crate::Leaf).
//!
//! Boolean marks (bold, italic, underline) are toggled. Valued marks
//! (color, background color, font size, font family) are only ever
//! overwritten or cleared.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// A boolean mark that can be toggled on a selection.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MarkFormat {
    Bold,
    Italic,
    Underline,
}

/// A mark holding a CSS value. The declaration order is the order in
/// which properties are written into a `style` attribute.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "camelCase")]
pub enum ValuedMark {
    Color,
    BackgroundColor,
    FontSize,
    FontFamily,
}

impl ValuedMark {
    /// The CSS property this mark is written as.
    pub fn css_property(&self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::BackgroundColor => "background-color",
            Self::FontSize => "font-size",
            Self::FontFamily => "font-family",
        }
    }

    pub fn from_css_property(property: &str) -> Option<Self> {
        Self::iter().find(|mark| mark.css_property() == property)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marks {
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub bold: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub italic: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub underline: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

impl Marks {
    pub fn has(&self, format: MarkFormat) -> bool {
        match format {
            MarkFormat::Bold => self.bold,
            MarkFormat::Italic => self.italic,
            MarkFormat::Underline => self.underline,
        }
    }

    pub fn set(&mut self, format: MarkFormat, on: bool) {
        match format {
            MarkFormat::Bold => self.bold = on,
            MarkFormat::Italic => self.italic = on,
            MarkFormat::Underline => self.underline = on,
        }
    }

    pub fn value(&self, mark: ValuedMark) -> Option<&str> {
        self.value_slot(mark).as_deref()
    }

    pub fn set_value(&mut self, mark: ValuedMark, value: Option<String>) {
        *self.value_slot_mut(mark) = value;
    }

    /// True if any valued mark is set, i.e. the leaf needs a `<span>`.
    pub fn has_style(&self) -> bool {
        ValuedMark::iter().any(|mark| self.value(mark).is_some())
    }

    /// The set valued marks in serialization order.
    pub fn style_declarations(&self) -> Vec<(ValuedMark, &str)> {
        ValuedMark::iter()
            .filter_map(|mark| self.value(mark).map(|v| (mark, v)))
            .collect()
    }

    fn value_slot(&self, mark: ValuedMark) -> &Option<String> {
        match mark {
            ValuedMark::Color => &self.color,
            ValuedMark::BackgroundColor => &self.background_color,
            ValuedMark::FontSize => &self.font_size,
            ValuedMark::FontFamily => &self.font_family,
        }
    }

    fn value_slot_mut(&mut self, mark: ValuedMark) -> &mut Option<String> {
        match mark {
            ValuedMark::Color => &mut self.color,
            ValuedMark::BackgroundColor => &mut self.background_color,
            ValuedMark::FontSize => &mut self.font_size,
            ValuedMark::FontFamily => &mut self.font_family,
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn style_declarations_follow_fixed_order() {
        let marks = Marks {
            font_family: Some("Arial".into()),
            color: Some("red".into()),
            font_size: Some("12px".into()),
            ..Default::default()
        };
        let props: Vec<&str> = marks
            .style_declarations()
            .into_iter()
            .map(|(mark, _)| mark.css_property())
            .collect();
        assert_eq!(props, vec!["color", "font-size", "font-family"]);
    }

    #[test]
    fn mark_names_parse_from_strings() {
        assert_eq!(MarkFormat::from_str("bold").unwrap(), MarkFormat::Bold);
        assert_eq!(
            ValuedMark::from_str("background-color").unwrap(),
            ValuedMark::BackgroundColor
        );
        assert_eq!(
            ValuedMark::from_css_property("font-size"),
            Some(ValuedMark::FontSize)
        );
        assert_eq!(ValuedMark::from_css_property("margin"), None);
    }

    #[test]
    fn marks_without_values_need_no_style() {
        let mut marks = Marks::default();
        marks.set(MarkFormat::Bold, true);
        assert!(!marks.has_style());
        marks.set_value(ValuedMark::Color, Some("#fff".into()));
        assert!(marks.has_style());
        assert_eq!(marks.value(ValuedMark::Color), Some("#fff"));
    }
}

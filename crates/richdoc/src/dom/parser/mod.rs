// Copyright 2024 New Vector Ltd.
// Copyright 2022 The Matrix.org Foundation C.I.C.
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! HTML → [`Document`](crate::Document).
//!
//! html5ever feeds a [`PaDomCreator`] which builds a flat arena DOM
//! ([`PaDom`]); [`parse`] then walks that arena and produces blocks and
//! leaves. The arena only lives for the duration of one parse.

mod padom;
mod padom_creator;
mod panode_container;
mod parse;
mod style;

pub(crate) use padom::{PaDom, PaDomHandle, PaDomNode, PaNodeText};
pub(crate) use padom_creator::PaDomCreator;
pub(crate) use panode_container::PaNodeContainer;
pub use parse::{parse, parse_html, parse_with_notes, ParseDegradation};

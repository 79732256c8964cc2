// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity and behaviour.
//!
//! An *element* is a node in the visual tree. Each element has:
//!
//! - An identity ([`ElementId`]): a generational handle that becomes stale
//!   when the element is destroyed.
//! - A behaviour implementing [`Element`], which receives lifecycle hooks and
//!   exposes the element's public child enumeration.
//! - Attachment state owned by the [`VisualTree`](crate::tree::VisualTree).
//!
//! [`Panel`] is the stock ordered container; it attaches its children when it
//! is itself attached.

mod behavior;
mod id;
mod panel;

pub use behavior::{Element, Leaf, Visibility};
pub use id::{ElementId, HostId, INVALID};
pub use panel::Panel;

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM adapter contract for platform integrations.
//!
//! The visual tree never touches a platform presentation tree directly. It
//! drives a [`DomAdapter`], which owns the real nodes and hands out opaque
//! [`DomHandle`]s for them:
//!
//! - **Structure**: [`create_dom_node`](DomAdapter::create_dom_node) and
//!   [`remove_dom_node`](DomAdapter::remove_dom_node). Removing a node
//!   removes its whole DOM subtree; the tree relies on this and never removes
//!   descendants one by one.
//! - **Presentation**: visibility, pointer events, inline styles, and CSS
//!   classes.
//! - **Input**: wiring and unwiring native input listeners.
//! - **Registry**: the global handle → element map that native event
//!   dispatch uses to find the element behind a DOM node.
//!
//! # Crate boundaries
//!
//! `arbor_core` owns the contract and [`HeadlessDom`], an in-memory
//! implementation for tests and server-side use. `arbor_backend_web` provides
//! the `web-sys` implementation.

mod headless;

use alloc::string::String;
use core::any::Any;
use core::fmt;

use crate::element::ElementId;

pub use headless::{DomOp, HeadlessDom};

/// A handle to a node owned by a [`DomAdapter`].
///
/// Adapters must never hand out the same handle twice, even after a node is
/// removed: the tree compares handles to detect that an element was detached
/// and re-attached while it was being notified.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DomHandle {
    /// Adapter-defined slot index.
    pub idx: u32,
    /// Adapter-defined generation for the slot.
    pub generation: u32,
}

impl DomHandle {
    /// Creates a handle from an adapter slot and generation.
    #[inline]
    #[must_use]
    pub const fn new(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }
}

impl fmt::Debug for DomHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DomHandle({}@gen{})", self.idx, self.generation)
    }
}

/// A failure reported by a [`DomAdapter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomError {
    message: String,
}

impl DomError {
    /// Creates an error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl core::error::Error for DomError {}

/// Creates, mutates, and removes the presentation nodes that mirror the
/// visual tree.
///
/// Operations on a handle whose node has already been removed must be
/// ignored rather than treated as errors: teardown unregisters every node of
/// a subtree after the subtree root has been taken out of the document.
///
/// Adapters are `'static` so that a tree can hand them back by concrete type
/// (see [`VisualTree::dom_as`](crate::tree::VisualTree::dom_as)).
pub trait DomAdapter: Any {
    /// Creates the DOM node for `element` under `parent`.
    ///
    /// `index` is the position among `parent`'s DOM children; `None` appends.
    fn create_dom_node(
        &mut self,
        parent: DomHandle,
        element: ElementId,
        index: Option<usize>,
    ) -> Result<DomHandle, DomError>;

    /// Removes `node` (and with it, its DOM subtree) from its DOM parent.
    fn remove_dom_node(&mut self, node: DomHandle);

    /// Shows or hides `node`.
    fn set_visible(&mut self, node: DomHandle, visible: bool);

    /// Enables or disables pointer-event delivery to `node`.
    fn set_pointer_events(&mut self, node: DomHandle, enabled: bool);

    /// Sets an inline style property on `node`.
    fn set_style(&mut self, node: DomHandle, property: &str, value: &str);

    /// Adds a CSS class to `node`.
    fn add_css_class(&mut self, node: DomHandle, class: &str);

    /// Wires native input listeners that route events on `node` to `element`.
    fn attach_input_listeners(&mut self, node: DomHandle, element: ElementId);

    /// Removes the listeners installed by
    /// [`attach_input_listeners`](Self::attach_input_listeners).
    fn detach_input_listeners(&mut self, node: DomHandle, element: ElementId);

    /// Records `element` as the owner of `node` in the global registry.
    fn register_globally(&mut self, node: DomHandle, element: ElementId);

    /// Drops `node` from the global registry.
    fn unregister_globally(&mut self, node: DomHandle);
}

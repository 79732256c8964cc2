// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Focus and pointer-capture bookkeeping.
//!
//! The [`InputManager`] remembers which element holds keyboard focus and
//! which holds pointer capture. Both are released when the holder leaves the
//! live tree, so a detached element can never swallow input.

use crate::element::ElementId;

/// Focus and capture state for one visual tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputManager {
    focused: Option<ElementId>,
    captured: Option<ElementId>,
}

impl InputManager {
    /// Creates a manager with nothing focused or captured.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            focused: None,
            captured: None,
        }
    }

    /// Returns the element holding keyboard focus.
    #[inline]
    #[must_use]
    pub const fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    /// Returns the element holding pointer capture.
    #[inline]
    #[must_use]
    pub const fn captured(&self) -> Option<ElementId> {
        self.captured
    }

    /// Returns whether `element` holds focus or capture.
    #[must_use]
    pub fn holds(&self, element: ElementId) -> bool {
        self.focused == Some(element) || self.captured == Some(element)
    }

    /// Records `element` as focused. The tree only calls this for live
    /// elements.
    pub(crate) fn set_focused(&mut self, element: Option<ElementId>) {
        self.focused = element;
    }

    /// Records `element` as the pointer-capture holder.
    pub(crate) fn set_captured(&mut self, element: Option<ElementId>) {
        self.captured = element;
    }

    /// Releases focus and capture held by `element`.
    ///
    /// Called by the tree while `element` is torn down.
    pub fn on_element_removed(&mut self, element: ElementId) {
        if self.focused == Some(element) {
            self.focused = None;
        }
        if self.captured == Some(element) {
            self.captured = None;
        }
    }
}

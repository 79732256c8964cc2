// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility, hit testing, focus, and deferred-rendering resolution.

use alloc::vec::Vec;

use understory_dirty::EagerPolicy;

use crate::dirty;
use crate::element::{ElementId, INVALID, Visibility};
use crate::trace::ReconcileTrigger;

use super::VisualTree;

impl VisualTree {
    /// Returns the element's own visibility.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visibility(&self, id: ElementId) -> Visibility {
        self.validate(id);
        self.visibility[id.idx as usize]
    }

    /// Returns whether the element and all of its visual ancestors are
    /// [`Visibility::Visible`].
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.validate(id);
        let mut idx = id.idx;
        while idx != INVALID {
            if self.visibility[idx as usize] == Visibility::Collapsed {
                return false;
            }
            idx = self.visual_parent[idx as usize];
        }
        true
    }

    /// Returns whether pointer input should reach the element: it accepts
    /// hit testing and is effectively visible.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_hit_testable(&self, id: ElementId) -> bool {
        self.hit_test_visible(id) && self.is_visible(id)
    }

    /// Returns whether the element accepts hit testing.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn hit_test_visible(&self, id: ElementId) -> bool {
        self.validate(id);
        self.hit_test_visible[id.idx as usize]
    }

    /// Sets the element's own visibility.
    ///
    /// Connected elements show or hide their DOM node immediately. When the
    /// change makes elements with deferred rendering effectively visible,
    /// their properties are reconciled now, ancestors before descendants.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_visibility(&mut self, id: ElementId, visibility: Visibility) {
        self.validate(id);
        let i = id.idx as usize;
        if self.visibility[i] == visibility {
            return;
        }
        self.visibility[i] = visibility;
        if self.connected[i]
            && let Some(node) = self.dom_node[i]
        {
            self.dom
                .set_visible(node, visibility == Visibility::Visible);
        }

        self.dirty
            .mark_with(id.idx, dirty::VISIBILITY, &EagerPolicy);
        let affected: Vec<u32> = self
            .dirty
            .drain(dirty::VISIBILITY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in affected {
            let Some(element) = self.id_at(idx) else {
                continue;
            };
            // Earlier reconciliations may have re-shaped the tree.
            if !self.is_alive(element) {
                continue;
            }
            let i = idx as usize;
            if self.connected[i] && self.deferred[i] && self.is_visible(element) {
                self.deferred[i] = false;
                self.reconcile(element, ReconcileTrigger::DeferredResolved);
            }
        }
    }

    /// Sets whether the element accepts hit testing.
    ///
    /// Live elements whose rendering is not deferred push the resulting
    /// pointer-events state to their DOM node.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn set_hit_test_visible(&mut self, id: ElementId, hit_test_visible: bool) {
        self.validate(id);
        let i = id.idx as usize;
        self.hit_test_visible[i] = hit_test_visible;
        if self.connected[i]
            && !self.deferred[i]
            && let Some(node) = self.dom_node[i]
        {
            let enabled = self.is_hit_testable(id);
            self.dom.set_pointer_events(node, enabled);
        }
    }

    /// Gives keyboard focus to `id`.
    ///
    /// Returns `false`, leaving focus unchanged, if the element is not in the
    /// visual tree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn focus(&mut self, id: ElementId) -> bool {
        if !self.is_element_in_visual_tree(id) {
            return false;
        }
        self.input.set_focused(Some(id));
        true
    }

    /// Routes pointer input to `id` until released.
    ///
    /// Returns `false`, leaving capture unchanged, if the element is not in
    /// the visual tree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn capture_pointer(&mut self, id: ElementId) -> bool {
        if !self.is_element_in_visual_tree(id) {
            return false;
        }
        self.input.set_captured(Some(id));
        true
    }

    /// Releases pointer capture, whoever holds it.
    pub fn release_pointer_capture(&mut self) {
        self.input.set_captured(None);
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Disconnecting elements from the live tree.

use alloc::vec::Vec;

use crate::element::ElementId;
use crate::error::TreeError;
use crate::trace::{DetachEvent, DetachKind, LifecycleEvent, LifecyclePhase, SpanKind};

use super::VisualTree;

impl VisualTree {
    /// Detaches `child` from `parent`.
    ///
    /// When `child` is in the visual tree its DOM node is removed (taking the
    /// DOM subtree with it) and the whole subtree is torn down in two passes:
    /// first every node is flagged as unloading, then each node is torn down
    /// before its children. During the second pass every node still reports
    /// [`is_unloading`](Self::is_unloading) until its own teardown ran, so a
    /// hook can tell that its ancestors are going away.
    ///
    /// When `child` is only recorded under `parent` (for instance because it
    /// is already being unloaded), the record is dropped and the subtree
    /// still recorded under `child` is torn down without touching the DOM.
    ///
    /// Per-node teardown releases focus and capture, calls `on_detached`,
    /// removes input listeners, calls `on_unloaded` and `unload_resources`
    /// on framework elements, unregisters the DOM node, and finally resets the
    /// node's attachment state. Stored property values survive.
    ///
    /// Nothing happens when `child` is `None` or neither live nor recorded
    /// under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if `child` is live but not recorded
    /// under `parent`, and propagates lifecycle hook errors (teardown stops
    /// at the failing hook).
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn detach_visual_child(
        &mut self,
        child: impl Into<Option<ElementId>>,
        parent: ElementId,
    ) -> Result<(), TreeError> {
        let Some(child) = child.into() else {
            return Ok(());
        };
        self.validate(child);
        self.validate(parent);

        let listed = self.is_listed_under(child, parent);
        if self.is_element_in_visual_tree(child) {
            if !listed {
                return Err(TreeError::NotAChild {
                    child: self.type_name(child),
                    parent: self.type_name(parent),
                });
            }

            self.span_begin(SpanKind::Detach, child);
            self.tracer.detach(&DetachEvent {
                element: child,
                parent: Some(parent),
                kind: DetachKind::Full,
            });
            if let Some(node) = self.dom_node[child.idx as usize] {
                self.dom.remove_dom_node(node);
            }
            self.unlink_child(parent, child);
            let result = self.unload_subtree(child);
            self.span_end(SpanKind::Detach, child);
            result
        } else if listed {
            self.tracer.detach(&DetachEvent {
                element: child,
                parent: Some(parent),
                kind: DetachKind::LogicalOnly,
            });
            self.unlink_child(parent, child);
            self.unload_recursive(child)
        } else {
            Ok(())
        }
    }

    /// Tears down a root connected with [`attach_root`](Self::attach_root).
    ///
    /// The host-owned DOM node stays in the document; only the nodes the tree
    /// created under it are removed. Detaching a root that is not in the
    /// visual tree is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::NotAChild`] if the element has a visual parent
    /// (detach it from that parent instead), and propagates lifecycle hook
    /// errors.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn detach_root(&mut self, root: ElementId) -> Result<(), TreeError> {
        if !self.is_element_in_visual_tree(root) {
            return Ok(());
        }
        if self.visual_parent(root).is_some() {
            return Err(TreeError::NotAChild {
                child: self.type_name(root),
                parent: "host root",
            });
        }

        self.span_begin(SpanKind::Detach, root);
        self.tracer.detach(&DetachEvent {
            element: root,
            parent: None,
            kind: DetachKind::Full,
        });
        // Children's nodes live under the host node, which stays.
        if let Some(children) = self.visual_children[root.idx as usize].clone() {
            for child in children {
                if let Some(node) = self.dom_node[child.idx as usize] {
                    self.dom.remove_dom_node(node);
                }
            }
        }
        let result = self.unload_subtree(root);
        self.span_end(SpanKind::Detach, root);
        result
    }

    fn unload_subtree(&mut self, element: ElementId) -> Result<(), TreeError> {
        self.propagate_unloading(element);
        self.unload_recursive(element)
    }

    /// Flags `element` and every recorded descendant as unloading.
    fn propagate_unloading(&mut self, element: ElementId) {
        let mut stack: Vec<ElementId> = alloc::vec![element];
        while let Some(id) = stack.pop() {
            let i = id.idx as usize;
            self.unloading[i] = true;
            if let Some(children) = &self.visual_children[i] {
                stack.extend(children.iter().rev().copied());
            }
        }
    }

    fn unload_recursive(&mut self, element: ElementId) -> Result<(), TreeError> {
        // Teardown resets the child list; walk the list as it was.
        let children = self.visual_children[element.idx as usize]
            .clone()
            .unwrap_or_default();
        self.unload_visual(element)?;
        for child in children {
            // Skip children a hook already detached (and possibly destroyed
            // or re-attached elsewhere).
            if self.is_alive(child) && self.visual_parent[child.idx as usize] == element.idx {
                self.unload_recursive(child)?;
            }
        }
        Ok(())
    }

    /// Tears down a single node and resets its attachment state.
    fn unload_visual(&mut self, element: ElementId) -> Result<(), TreeError> {
        let i = element.idx as usize;
        self.unloading[i] = true;

        if self.connected[i] {
            if self.input.holds(element) {
                self.input.on_element_removed(element);
            }
            if let Some(behavior) = self.live_behavior(element) {
                self.tracer.lifecycle(&LifecycleEvent {
                    element,
                    phase: LifecyclePhase::Detached,
                });
                behavior.on_detached(self, element)?;

                if let Some(node) = self.dom_node[i] {
                    self.dom.detach_input_listeners(node, element);
                }
                self.loaded[i] = false;

                if behavior.is_framework_element() {
                    self.tracer.lifecycle(&LifecycleEvent {
                        element,
                        phase: LifecyclePhase::Unloaded,
                    });
                    behavior.on_unloaded(self, element)?;
                    behavior.unload_resources(self, element)?;
                }
            }
            if let Some(node) = self.dom_node[i] {
                self.dom.unregister_globally(node);
            }
        }

        self.connected[i] = false;
        self.unloading[i] = false;
        self.dom_node[i] = None;
        self.visual_children[i] = None;
        self.deferred[i] = false;
        self.host[i] = None;
        self.clear_parent_link(element);
        Ok(())
    }
}

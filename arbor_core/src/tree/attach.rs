// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Connecting elements to the live tree.

use crate::dom::DomHandle;
use crate::element::{ElementId, HostId, Visibility};
use crate::error::TreeError;
use crate::trace::{
    AttachEndEvent, AttachEvent, AttachOutcome, LifecycleEvent, LifecyclePhase, ReconcileTrigger,
    SpanKind,
};

use super::VisualTree;

impl VisualTree {
    /// Attaches `child` under `parent` and brings it to life.
    ///
    /// The child gets a DOM node under the parent's node (at `index` among
    /// its DOM siblings, or appended), input listeners, and then, in order:
    /// `load_resources`, `on_attached`, property reconciliation, and
    /// `on_loaded`. Containers attach their own children from `on_attached`,
    /// so a whole subtree comes alive from one call and children finish
    /// loading before their parent.
    ///
    /// Nothing happens when `child` is `None`, when `parent` is not in the
    /// visual tree, or when `child` is already connected under `parent` (or
    /// is a connected root).
    ///
    /// Reconciliation is skipped, and the element marked as deferred, when
    /// [`TreeConfig::defer_collapsed_rendering`](crate::config::TreeConfig)
    /// is set and the element is not effectively visible. It runs once the
    /// element becomes visible (see [`set_visibility`](Self::set_visibility)).
    ///
    /// If a hook detaches or re-attaches `child` while it is being attached,
    /// this call stops right after `on_attached` without raising `on_loaded`;
    /// the nested attach has already delivered it.
    ///
    /// # Errors
    ///
    /// - [`TreeError::AlreadyHasParent`] if `child` is connected under
    ///   another parent. Nothing is mutated.
    /// - [`TreeError::MissingDomNode`] if `parent` is live but has no DOM
    ///   node. Nothing is mutated.
    /// - [`TreeError::Dom`] if the adapter fails to create the node, and any
    ///   error returned by a lifecycle hook. Work done before the failure is
    ///   not rolled back.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn attach_visual_child(
        &mut self,
        child: impl Into<Option<ElementId>>,
        parent: ElementId,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        let Some(child) = child.into() else {
            return Ok(());
        };
        self.validate(child);
        self.validate(parent);

        if !self.is_element_in_visual_tree(parent) {
            return Ok(());
        }

        let c = child.idx as usize;
        if self.connected[c] {
            return match self.visual_parent(child) {
                Some(current) if current != parent => Err(TreeError::AlreadyHasParent {
                    child: self.type_name(child),
                    current_parent: self.type_name(current),
                    requested_parent: self.type_name(parent),
                }),
                _ => Ok(()),
            };
        }

        let Some(parent_node) = self.dom_node[parent.idx as usize] else {
            return Err(TreeError::MissingDomNode {
                element: self.type_name(parent),
            });
        };

        self.span_begin(SpanKind::Attach, child);
        let result = self.attach_under(child, parent, parent_node, index);
        self.span_end(SpanKind::Attach, child);
        result
    }

    /// Connects a parentless element to a node owned by the host, such as
    /// the root element of a window.
    ///
    /// The element adopts `node` as its DOM node instead of creating one, and
    /// `host` becomes the host of the whole subtree. The rest of the attach
    /// sequence is the same as in
    /// [`attach_visual_child`](Self::attach_visual_child).
    ///
    /// Attaching a root that is already connected is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::AlreadyHasParent`] if the element is connected
    /// under a visual parent, and propagates lifecycle hook errors.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn attach_root(
        &mut self,
        root: ElementId,
        host: HostId,
        node: DomHandle,
    ) -> Result<(), TreeError> {
        self.validate(root);
        let r = root.idx as usize;
        if self.connected[r] {
            return match self.visual_parent(root) {
                Some(current) => Err(TreeError::AlreadyHasParent {
                    child: self.type_name(root),
                    current_parent: self.type_name(current),
                    requested_parent: "host root",
                }),
                None => Ok(()),
            };
        }

        self.span_begin(SpanKind::Attach, root);
        self.tracer.attach(&AttachEvent {
            element: root,
            parent: None,
            type_name: self.type_name(root),
            index: None,
        });
        self.connected[r] = true;
        self.host[r] = Some(host);
        self.adopt_dom_node(root, node);
        let result = self.finish_attach(root, node);
        self.span_end(SpanKind::Attach, root);
        result
    }

    fn attach_under(
        &mut self,
        child: ElementId,
        parent: ElementId,
        parent_node: DomHandle,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        self.tracer.attach(&AttachEvent {
            element: child,
            parent: Some(parent),
            type_name: self.type_name(child),
            index,
        });

        let c = child.idx as usize;
        self.link_child(parent, child);
        self.connected[c] = true;
        self.host[c] = self.host[parent.idx as usize];

        let node = self.dom.create_dom_node(parent_node, child, index)?;
        self.adopt_dom_node(child, node);
        self.finish_attach(child, node)
    }

    fn adopt_dom_node(&mut self, element: ElementId, node: DomHandle) {
        self.dom_node[element.idx as usize] = Some(node);
        self.dom.register_globally(node, element);
        if self.config.assign_type_class {
            let class = self.type_name(element);
            self.dom.add_css_class(node, class);
        }
    }

    /// Runs the part of the attach sequence that follows DOM node creation.
    fn finish_attach(&mut self, element: ElementId, node: DomHandle) -> Result<(), TreeError> {
        let Some(behavior) = self.live_behavior(element) else {
            return Ok(());
        };
        let framework = behavior.is_framework_element();

        self.dom.attach_input_listeners(node, element);

        if framework {
            behavior.load_resources(self, element)?;
        }
        if !self.still_attached_as(element, node) {
            return self.superseded(element);
        }
        self.loaded[element.idx as usize] = true;

        self.tracer.lifecycle(&LifecycleEvent {
            element,
            phase: LifecyclePhase::Attached,
        });
        behavior.on_attached(self, element)?;

        // A hook detached (and maybe re-attached) the element. The nested
        // attach, if any, has already run the remaining steps.
        if !self.still_attached_as(element, node) {
            return self.superseded(element);
        }

        let i = element.idx as usize;
        let own_collapsed = self.visibility[i] == Visibility::Collapsed;
        let outcome = if self.config.defer_collapsed_rendering && !self.is_visible(element) {
            self.deferred[i] = true;
            if own_collapsed {
                self.dom.set_visible(node, false);
            }
            AttachOutcome::Deferred
        } else {
            if own_collapsed {
                self.dom.set_visible(node, false);
            }
            self.reconcile(element, ReconcileTrigger::Attach);
            AttachOutcome::Completed
        };

        if framework && self.is_alive(element) {
            self.tracer.lifecycle(&LifecycleEvent {
                element,
                phase: LifecyclePhase::Loaded,
            });
            behavior.on_loaded(self, element)?;
        }

        self.tracer.attach_end(&AttachEndEvent { element, outcome });
        Ok(())
    }

    fn still_attached_as(&self, element: ElementId, node: DomHandle) -> bool {
        self.is_alive(element) && self.dom_node[element.idx as usize] == Some(node)
    }

    fn superseded(&mut self, element: ElementId) -> Result<(), TreeError> {
        self.tracer.attach_end(&AttachEndEvent {
            element,
            outcome: AttachOutcome::Superseded,
        });
        Ok(())
    }
}

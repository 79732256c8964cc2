// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory DOM adapter.
//!
//! [`HeadlessDom`] keeps a plain node tree plus a log of every call it
//! receives. Tests use the log to assert exactly which DOM mutations a tree
//! operation performed; the demo uses it to run without a browser.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::element::{ElementId, INVALID};

use super::{DomAdapter, DomError, DomHandle};

/// One call received by a [`HeadlessDom`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DomOp {
    /// [`DomAdapter::create_dom_node`].
    Create {
        /// The created node.
        node: DomHandle,
        /// Its DOM parent.
        parent: DomHandle,
        /// The element it represents.
        element: ElementId,
        /// The requested position, if any.
        index: Option<usize>,
    },
    /// [`DomAdapter::remove_dom_node`].
    Remove(DomHandle),
    /// [`DomAdapter::set_visible`].
    SetVisible(DomHandle, bool),
    /// [`DomAdapter::set_pointer_events`].
    SetPointerEvents(DomHandle, bool),
    /// [`DomAdapter::set_style`].
    SetStyle {
        /// The styled node.
        node: DomHandle,
        /// CSS property name.
        property: String,
        /// CSS value.
        value: String,
    },
    /// [`DomAdapter::add_css_class`].
    AddClass(DomHandle, String),
    /// [`DomAdapter::attach_input_listeners`].
    AttachListeners(DomHandle, ElementId),
    /// [`DomAdapter::detach_input_listeners`].
    DetachListeners(DomHandle, ElementId),
    /// [`DomAdapter::register_globally`].
    Register(DomHandle, ElementId),
    /// [`DomAdapter::unregister_globally`].
    Unregister(DomHandle),
}

#[derive(Clone, Debug, Default)]
struct Node {
    parent: u32,
    children: Vec<u32>,
    visible: bool,
    pointer_events: bool,
    styles: Vec<(String, String)>,
    classes: Vec<String>,
    listeners: Option<ElementId>,
}

impl Node {
    fn fresh(parent: u32) -> Self {
        Self {
            parent,
            visible: true,
            ..Self::default()
        }
    }
}

/// A [`DomAdapter`] backed by an in-memory node tree.
///
/// Removed nodes are freed together with their descendants; their slots are
/// reused with a bumped generation so handles are never handed out twice.
#[derive(Debug, Default)]
pub struct HeadlessDom {
    nodes: Vec<Option<Node>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    registry: Vec<(DomHandle, ElementId)>,
    log: Vec<DomOp>,
}

impl HeadlessDom {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a parentless node to host a tree root (the window's root
    /// container). Not logged.
    pub fn create_host_node(&mut self) -> DomHandle {
        self.alloc(INVALID)
    }

    /// Returns whether `node` refers to a node that has not been removed.
    #[must_use]
    pub fn is_alive(&self, node: DomHandle) -> bool {
        self.node(node).is_some()
    }

    /// Returns the DOM parent of `node`.
    #[must_use]
    pub fn parent_of(&self, node: DomHandle) -> Option<DomHandle> {
        let parent = self.node(node)?.parent;
        (parent != INVALID).then(|| self.handle_at(parent))
    }

    /// Returns the DOM children of `node` in document order.
    #[must_use]
    pub fn children_of(&self, node: DomHandle) -> Vec<DomHandle> {
        self.node(node)
            .map(|n| n.children.iter().map(|&c| self.handle_at(c)).collect())
            .unwrap_or_default()
    }

    /// Returns whether `node` is visible. Removed nodes report `false`.
    #[must_use]
    pub fn is_visible(&self, node: DomHandle) -> bool {
        self.node(node).is_some_and(|n| n.visible)
    }

    /// Returns whether pointer events are enabled on `node`.
    #[must_use]
    pub fn pointer_events(&self, node: DomHandle) -> bool {
        self.node(node).is_some_and(|n| n.pointer_events)
    }

    /// Returns the current value of an inline style property.
    #[must_use]
    pub fn style(&self, node: DomHandle, property: &str) -> Option<&str> {
        self.node(node)?
            .styles
            .iter()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// Returns whether `node` carries the CSS class `class`.
    #[must_use]
    pub fn has_class(&self, node: DomHandle, class: &str) -> bool {
        self.node(node)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }

    /// Returns whether input listeners are currently wired on `node`.
    #[must_use]
    pub fn has_listeners(&self, node: DomHandle) -> bool {
        self.node(node).is_some_and(|n| n.listeners.is_some())
    }

    /// Returns the element registered for `node`, if any.
    #[must_use]
    pub fn registered_element(&self, node: DomHandle) -> Option<ElementId> {
        self.registry
            .iter()
            .find(|(h, _)| *h == node)
            .map(|&(_, element)| element)
    }

    /// Returns the number of entries in the global registry.
    #[must_use]
    pub fn registered_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the call log.
    #[must_use]
    pub fn log(&self) -> &[DomOp] {
        &self.log
    }

    /// Takes the call log, leaving it empty.
    pub fn take_log(&mut self) -> Vec<DomOp> {
        core::mem::take(&mut self.log)
    }

    fn node(&self, node: DomHandle) -> Option<&Node> {
        if self.generation.get(node.idx as usize) != Some(&node.generation) {
            return None;
        }
        self.nodes.get(node.idx as usize)?.as_ref()
    }

    fn node_mut(&mut self, node: DomHandle) -> Option<&mut Node> {
        if self.generation.get(node.idx as usize) != Some(&node.generation) {
            return None;
        }
        self.nodes.get_mut(node.idx as usize)?.as_mut()
    }

    fn handle_at(&self, idx: u32) -> DomHandle {
        DomHandle::new(idx, self.generation[idx as usize])
    }

    fn alloc(&mut self, parent: u32) -> DomHandle {
        let idx = if let Some(idx) = self.free_list.pop() {
            self.generation[idx as usize] += 1;
            self.nodes[idx as usize] = Some(Node::fresh(parent));
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "headless documents stay far below u32::MAX nodes"
            )]
            let idx = self.nodes.len() as u32;
            self.nodes.push(Some(Node::fresh(parent)));
            self.generation.push(0);
            idx
        };
        self.handle_at(idx)
    }

    /// Frees `idx` and all of its descendants.
    fn free_subtree(&mut self, idx: u32) {
        let Some(node) = self.nodes[idx as usize].take() else {
            return;
        };
        for child in node.children {
            self.free_subtree(child);
        }
        self.free_list.push(idx);
    }
}

impl DomAdapter for HeadlessDom {
    fn create_dom_node(
        &mut self,
        parent: DomHandle,
        element: ElementId,
        index: Option<usize>,
    ) -> Result<DomHandle, DomError> {
        if self.node(parent).is_none() {
            return Err(DomError::new("parent DOM node has been removed"));
        }
        let node = self.alloc(parent.idx);
        if let Some(p) = self.node_mut(parent) {
            match index {
                Some(i) if i < p.children.len() => p.children.insert(i, node.idx),
                _ => p.children.push(node.idx),
            }
        }
        self.log.push(DomOp::Create {
            node,
            parent,
            element,
            index,
        });
        Ok(node)
    }

    fn remove_dom_node(&mut self, node: DomHandle) {
        self.log.push(DomOp::Remove(node));
        let Some(parent) = self.node(node).map(|n| n.parent) else {
            return;
        };
        if parent != INVALID
            && let Some(Some(p)) = self.nodes.get_mut(parent as usize)
        {
            p.children.retain(|&c| c != node.idx);
        }
        self.free_subtree(node.idx);
    }

    fn set_visible(&mut self, node: DomHandle, visible: bool) {
        self.log.push(DomOp::SetVisible(node, visible));
        if let Some(n) = self.node_mut(node) {
            n.visible = visible;
        }
    }

    fn set_pointer_events(&mut self, node: DomHandle, enabled: bool) {
        self.log.push(DomOp::SetPointerEvents(node, enabled));
        if let Some(n) = self.node_mut(node) {
            n.pointer_events = enabled;
        }
    }

    fn set_style(&mut self, node: DomHandle, property: &str, value: &str) {
        self.log.push(DomOp::SetStyle {
            node,
            property: property.to_string(),
            value: value.to_string(),
        });
        if let Some(n) = self.node_mut(node) {
            match n.styles.iter_mut().find(|(name, _)| name == property) {
                Some((_, v)) => *v = value.to_string(),
                None => n.styles.push((property.to_string(), value.to_string())),
            }
        }
    }

    fn add_css_class(&mut self, node: DomHandle, class: &str) {
        self.log.push(DomOp::AddClass(node, class.to_string()));
        if let Some(n) = self.node_mut(node)
            && !n.classes.iter().any(|c| c == class)
        {
            n.classes.push(class.to_string());
        }
    }

    fn attach_input_listeners(&mut self, node: DomHandle, element: ElementId) {
        self.log.push(DomOp::AttachListeners(node, element));
        if let Some(n) = self.node_mut(node) {
            n.listeners = Some(element);
        }
    }

    fn detach_input_listeners(&mut self, node: DomHandle, element: ElementId) {
        self.log.push(DomOp::DetachListeners(node, element));
        if let Some(n) = self.node_mut(node) {
            n.listeners = None;
        }
    }

    fn register_globally(&mut self, node: DomHandle, element: ElementId) {
        self.log.push(DomOp::Register(node, element));
        self.registry.retain(|(h, _)| *h != node);
        self.registry.push((node, element));
    }

    fn unregister_globally(&mut self, node: DomHandle) {
        self.log.push(DomOp::Unregister(node));
        self.registry.retain(|(h, _)| *h != node);
    }
}

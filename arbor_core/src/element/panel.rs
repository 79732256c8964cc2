// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generic ordered container.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::error::TreeError;
use crate::tree::VisualTree;

use super::behavior::Element;
use super::id::ElementId;

/// A container element that owns an ordered list of children.
///
/// The list is the panel's public child enumeration. Children can be added
/// while the panel is offscreen; they are attached to the live tree when the
/// panel itself is attached (from [`Element::on_attached`]), which is how a
/// whole subtree becomes live from a single attach call.
#[derive(Debug, Default)]
pub struct Panel {
    children: RefCell<Vec<ElementId>>,
}

impl Panel {
    /// Creates an empty panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the child list.
    #[must_use]
    pub fn children(&self) -> Vec<ElementId> {
        self.children.borrow().clone()
    }

    /// Appends `child` to the panel at `panel`.
    ///
    /// If the panel is live, the child is attached immediately. When the
    /// attach fails the child is taken back out of the list.
    pub fn add_child(
        tree: &mut VisualTree,
        panel: ElementId,
        child: ElementId,
    ) -> Result<(), TreeError> {
        let this = Self::resolve(tree, panel)?;
        let index = this.children.borrow().len();
        this.insert_at(tree, panel, index, child)
    }

    /// Inserts `child` at `index` in the panel at `panel`.
    ///
    /// `index` is clamped to the current child count.
    pub fn insert_child(
        tree: &mut VisualTree,
        panel: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), TreeError> {
        let this = Self::resolve(tree, panel)?;
        let index = index.min(this.children.borrow().len());
        this.insert_at(tree, panel, index, child)
    }

    /// Removes `child` from the panel at `panel`, detaching it if live.
    ///
    /// Returns whether the child was in the list.
    pub fn remove_child(
        tree: &mut VisualTree,
        panel: ElementId,
        child: ElementId,
    ) -> Result<bool, TreeError> {
        let this = Self::resolve(tree, panel)?;
        let position = this.children.borrow().iter().position(|&c| c == child);
        let Some(position) = position else {
            return Ok(false);
        };
        this.children.borrow_mut().remove(position);
        tree.detach_visual_child(child, panel)?;
        Ok(true)
    }

    fn resolve(tree: &VisualTree, panel: ElementId) -> Result<Rc<Self>, TreeError> {
        tree.behavior_as::<Self>(panel)
            .ok_or_else(|| TreeError::UnexpectedElementType {
                expected: "Panel",
                found: tree.type_name(panel),
            })
    }

    fn insert_at(
        &self,
        tree: &mut VisualTree,
        panel: ElementId,
        index: usize,
        child: ElementId,
    ) -> Result<(), TreeError> {
        self.children.borrow_mut().insert(index, child);
        let result = tree.attach_visual_child(child, panel, Some(index));
        if result.is_err() {
            let mut children = self.children.borrow_mut();
            if let Some(position) = children.iter().position(|&c| c == child) {
                children.remove(position);
            }
        }
        result
    }
}

impl Element for Panel {
    fn type_name(&self) -> &'static str {
        "Panel"
    }

    fn on_attached(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        // Snapshot: a child's hooks may add or remove siblings.
        let children = self.children();
        for child in children {
            tree.attach_visual_child(child, id, None)?;
        }
        Ok(())
    }

    fn visual_child_count(&self) -> usize {
        self.children.borrow().len()
    }

    fn visual_child(&self, index: usize) -> Option<ElementId> {
        self.children.borrow().get(index).copied()
    }
}

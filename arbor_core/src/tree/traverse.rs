// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use core::any::TypeId;

use crate::element::{Element, ElementId, INVALID};

use super::VisualTree;

/// An iterator over the visual ancestors of an element, nearest first.
///
/// Created by [`VisualTree::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    tree: &'a VisualTree,
    current: u32,
}

impl Iterator for Ancestors<'_> {
    type Item = ElementId;

    fn next(&mut self) -> Option<ElementId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.tree.visual_parent[idx as usize];
        self.tree.id_at(idx)
    }
}

impl VisualTree {
    /// Iterates over `id`'s visual ancestors, nearest first.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn ancestors(&self, id: ElementId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors {
            tree: self,
            current: self.visual_parent[id.idx as usize],
        }
    }

    /// Finds the first descendant of `root` whose behaviour is a `T`.
    ///
    /// The search is depth-first, pre-order, over each element's public child
    /// enumeration ([`Element::visual_child`]), not over the attachment
    /// bookkeeping, so it also finds children of containers that are not
    /// live. `root` itself is not a candidate.
    ///
    /// # Panics
    ///
    /// Panics if `root` is a stale handle.
    #[must_use]
    pub fn get_child_of_type<T: Element>(
        &self,
        root: impl Into<Option<ElementId>>,
    ) -> Option<ElementId> {
        let root = root.into()?;
        self.validate(root);
        self.find_child_of_type(root, TypeId::of::<T>())
    }

    fn find_child_of_type(&self, element: ElementId, target: TypeId) -> Option<ElementId> {
        let behavior = self.live_behavior(element)?;
        for index in 0..behavior.visual_child_count() {
            let Some(child) = behavior.visual_child(index) else {
                continue;
            };
            if !self.is_alive(child) {
                continue;
            }
            if self.behavior_type_id(child) == target {
                return Some(child);
            }
            if let Some(found) = self.find_child_of_type(child, target) {
                return Some(found);
            }
        }
        None
    }
}

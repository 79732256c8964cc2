// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The lifecycle contract every element implements.

use core::any::Any;

use crate::error::TreeError;
use crate::tree::VisualTree;

use super::id::ElementId;

/// Whether an element takes part in layout and rendering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// The element is displayed.
    #[default]
    Visible,
    /// The element is not displayed and takes no space.
    Collapsed,
}

/// Behaviour attached to an element in the visual tree.
///
/// The tree stores each behaviour behind an `Rc` and clones it out before
/// calling a hook, so hooks receive `&mut VisualTree` and may freely re-enter
/// the tree: attach or detach other elements, set properties, or even detach
/// and re-attach the element being notified. Implementations keep their own
/// mutable state in `Cell`/`RefCell`.
///
/// Every hook has a no-op default. Errors returned from a hook propagate to
/// the caller of the tree operation that triggered it.
///
/// The ordering guarantees are:
///
/// - [`load_resources`](Self::load_resources), then
///   [`on_attached`](Self::on_attached), then property reconciliation, then
///   [`on_loaded`](Self::on_loaded) when the element joins the live tree.
///   Children attached from inside `on_attached` therefore receive
///   `on_loaded` before their parent.
/// - When a subtree leaves the live tree every node in it reports
///   [`is_unloading`](VisualTree::is_unloading) before the first
///   [`on_detached`](Self::on_detached) fires. Nodes are then torn down
///   parent-first.
pub trait Element: Any {
    /// Returns a human-readable type name used in diagnostics and errors.
    fn type_name(&self) -> &'static str {
        core::any::type_name::<Self>()
    }

    /// Returns whether this is a framework element.
    ///
    /// Framework elements own logical content: they receive
    /// [`load_resources`](Self::load_resources) /
    /// [`unload_resources`](Self::unload_resources) and the
    /// [`on_loaded`](Self::on_loaded) / [`on_unloaded`](Self::on_unloaded)
    /// notifications. Bare visuals only see attach and detach.
    fn is_framework_element(&self) -> bool {
        true
    }

    /// Called before [`on_attached`](Self::on_attached) so that nested
    /// default visuals exist when the element is told it is live.
    fn load_resources(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Called once the element has a DOM node and input listeners, before
    /// its properties are reconciled.
    ///
    /// Containers attach their children here.
    fn on_attached(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Called after the element's properties have been pushed to the DOM
    /// (or deferred). Framework elements only.
    fn on_loaded(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Called during teardown while the element still has its DOM handle.
    ///
    /// Elements drop any references they keep to DOM nodes here.
    fn on_detached(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Called during teardown after input listeners are removed. Framework
    /// elements only.
    fn on_unloaded(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Releases resources cached by [`load_resources`](Self::load_resources).
    fn unload_resources(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        _ = (tree, id);
        Ok(())
    }

    /// Returns the number of children in the element's public child
    /// enumeration.
    ///
    /// This is independent of the tree's attachment bookkeeping; it is what
    /// [`get_child_of_type`](VisualTree::get_child_of_type) walks.
    fn visual_child_count(&self) -> usize {
        0
    }

    /// Returns the child at `index` in the public child enumeration.
    fn visual_child(&self, index: usize) -> Option<ElementId> {
        _ = index;
        None
    }
}

/// A bare framework element with no behaviour of its own.
///
/// Useful as a leaf placeholder and in tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct Leaf;

impl Element for Leaf {
    fn type_name(&self) -> &'static str {
        "Leaf"
    }
}

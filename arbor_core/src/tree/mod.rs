// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The visual tree: element storage, attach/detach, and reconciliation.
//!
//! [`VisualTree`] stores every element in struct-of-arrays form and keeps two
//! trees in step:
//!
//! - the **retained tree**: parent links and per-parent child lists recorded
//!   as elements are attached, and
//! - the **presentation tree**: one DOM node per connected element, created
//!   and removed through the tree's [`DomAdapter`](crate::dom::DomAdapter).
//!
//! # Lifecycle
//!
//! An element is *connected* from the moment
//! [`attach_visual_child`](VisualTree::attach_visual_child) (or
//! [`attach_root`](VisualTree::attach_root)) starts working on it until its
//! own teardown step runs during a detach. It is *in the visual tree* while
//! connected and not unloading; only such elements accept children.
//!
//! Behaviour hooks receive `&mut VisualTree` and may re-enter any operation.
//! The tree marks state before recursing, walks snapshots rather than live
//! lists, and re-checks the element's DOM handle after `on_attached`, so
//! nested operations stay consistent.
//!
//! # Deferred rendering
//!
//! Elements attached while not effectively visible skip property
//! reconciliation. A visibility change marks the
//! [`VISIBILITY`](crate::dirty::VISIBILITY) dirty channel, and every affected
//! element that became visible is reconciled in parent-before-child order.

mod attach;
mod detach;
mod properties;
mod reconcile;
mod store;
mod traverse;
mod visibility;

#[cfg(test)]
mod tests;

pub use store::VisualTree;
pub use traverse::Ancestors;

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The visual tree uses [`understory_dirty`] to find the elements affected by
//! a visibility change. Attaching a child adds a dependency edge from the
//! child to its parent on the [`VISIBILITY`] channel; detaching removes it.
//!
//! # Propagation semantics
//!
//! [`VISIBILITY`] is marked with
//! [`EagerPolicy`](understory_dirty::EagerPolicy), so marking an element also
//! marks every attached descendant. Draining the channel yields the affected
//! elements parent-before-child, which is the order deferred rendering must
//! be resolved in: a child's reconciliation may depend on state its parent
//! established in its own.
//!
//! # Consumption
//!
//! Callers never query dirty state directly.
//! [`VisualTree::set_visibility`](crate::tree::VisualTree::set_visibility)
//! marks and drains the channel in one step.

use understory_dirty::Channel;

/// Effective visibility changed; elements whose rendering was deferred may
/// now need reconciliation.
pub const VISIBILITY: Channel = Channel::new(0);

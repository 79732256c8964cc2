// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element and host identity types.

use core::fmt;

/// Sentinel value indicating "no element" in index fields.
pub const INVALID: u32 = u32::MAX;

/// A handle to an element in a [`VisualTree`](crate::tree::VisualTree).
///
/// Contains both a slot index and a generation counter so that stale handles
/// can be detected after an element is destroyed and the slot is reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId {
    /// Slot index into the tree's arrays.
    pub(crate) idx: u32,
    /// Generation counter; must match the tree's generation for this slot.
    pub(crate) generation: u32,
}

impl ElementId {
    /// Returns the raw slot index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.idx
    }

    /// Returns the generation counter.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }

    /// Rebuilds a handle from its raw parts.
    ///
    /// Intended for decoders that replay recorded trace data. A handle built
    /// this way is only meaningful against the tree it was recorded from.
    #[inline]
    #[must_use]
    pub const fn from_raw_parts(idx: u32, generation: u32) -> Self {
        Self { idx, generation }
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({}@gen{})", self.idx, self.generation)
    }
}

/// An opaque reference to the window or host an element is displayed in.
///
/// Roots receive their host in [`attach_root`](crate::tree::VisualTree::attach_root);
/// every attached descendant inherits it so that overlays and popups know
/// where to place themselves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct HostId(pub u32);

impl fmt::Debug for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostId({})", self.0)
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-element effective-value storage.

use alloc::vec::Vec;

use super::metadata::PropertyId;
use super::value::{EffectiveEntry, ValueSource};

/// The effective values stored on one element, in insertion order.
///
/// Entries are never removed: clearing a value downgrades its source to
/// [`ValueSource::Default`], which keeps enumeration order stable for the
/// lifetime of the element.
#[derive(Clone, Debug, Default)]
pub struct EffectiveValues {
    entries: Vec<(PropertyId, EffectiveEntry)>,
}

impl EffectiveValues {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the entry for `property`.
    #[must_use]
    pub fn get(&self, property: PropertyId) -> Option<&EffectiveEntry> {
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, entry)| entry)
    }

    /// Returns the entry for `property` mutably.
    pub fn get_mut(&mut self, property: PropertyId) -> Option<&mut EffectiveEntry> {
        self.entries
            .iter_mut()
            .find(|(p, _)| *p == property)
            .map(|(_, entry)| entry)
    }

    /// Stores `entry`, keeping the original position if `property` was
    /// already present.
    pub fn insert(&mut self, property: PropertyId, entry: EffectiveEntry) {
        match self.get_mut(property) {
            Some(slot) => *slot = entry,
            None => self.entries.push((property, entry)),
        }
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (PropertyId, &EffectiveEntry)> {
        self.entries.iter().map(|(p, entry)| (*p, entry))
    }

    /// Returns the ids of entries whose source is not
    /// [`ValueSource::Default`], in insertion order.
    ///
    /// The result is an owned snapshot: callers may mutate the store while
    /// walking it.
    #[must_use]
    pub fn set_properties(&self) -> Vec<PropertyId> {
        self.entries
            .iter()
            .filter(|(_, entry)| entry.source != ValueSource::Default)
            .map(|(p, _)| *p)
            .collect()
    }

    /// Returns the number of entries, including cleared ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no value was ever stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property identity, metadata, and the registry that resolves them.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::TypeId;
use core::fmt;

use crate::element::{Element, ElementId};
use crate::tree::VisualTree;

use super::value::Value;

/// A handle to a registered property.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(pub(crate) u32);

impl PropertyId {
    /// Returns the registration index (for diagnostics only).
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PropertyId({})", self.0)
    }
}

/// Pushes a value into the element's DOM node.
pub type UpdateDomFn = Rc<dyn Fn(&mut VisualTree, ElementId, &Value)>;

/// Pushes a value into the element's DOM node given the value it replaces.
///
/// The old value is [`Value::Unset`] when the value is materialised for the
/// first time.
pub type UpdateDomTransitionFn = Rc<dyn Fn(&mut VisualTree, ElementId, &Value, &Value)>;

/// Reacts to a property change.
pub type ChangedFn = Rc<dyn Fn(&mut VisualTree, ElementId, &PropertyChange)>;

/// Arguments of a [`ChangedFn`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct PropertyChange {
    /// The property that changed.
    pub property: PropertyId,
    /// The previous effective value.
    pub old_value: Value,
    /// The new effective value.
    pub new_value: Value,
}

/// Whether the changed callback re-runs when an element enters the live tree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FireOnLoad {
    /// Only real transitions notify.
    Never,
    /// Non-default values are re-announced (with old = new) when the element
    /// is reconciled.
    #[default]
    Always,
}

/// Callbacks and defaults for one property.
#[derive(Clone)]
pub struct PropertyMetadata {
    /// Property name, for diagnostics.
    pub name: &'static str,
    /// The value an element has when nothing else supplies one.
    pub default_value: Value,
    /// Writes the value into the DOM.
    pub update_dom: Option<UpdateDomFn>,
    /// Writes the value into the DOM, knowing the previous value.
    pub update_dom_transition: Option<UpdateDomTransitionFn>,
    /// Change notification.
    pub changed: Option<ChangedFn>,
    /// Whether `changed` also runs during reconciliation.
    pub fire_on_load: FireOnLoad,
}

impl fmt::Debug for PropertyMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyMetadata")
            .field("name", &self.name)
            .field("default_value", &self.default_value)
            .field("update_dom", &self.update_dom.is_some())
            .field("update_dom_transition", &self.update_dom_transition.is_some())
            .field("changed", &self.changed.is_some())
            .field("fire_on_load", &self.fire_on_load)
            .finish()
    }
}

impl PropertyMetadata {
    /// Creates metadata with no callbacks.
    #[must_use]
    pub fn new(name: &'static str, default_value: impl Into<Value>) -> Self {
        Self {
            name,
            default_value: default_value.into(),
            update_dom: None,
            update_dom_transition: None,
            changed: None,
            fire_on_load: FireOnLoad::default(),
        }
    }

    /// Sets the update-DOM callback.
    #[must_use]
    pub fn with_update_dom(
        mut self,
        f: impl Fn(&mut VisualTree, ElementId, &Value) + 'static,
    ) -> Self {
        self.update_dom = Some(Rc::new(f));
        self
    }

    /// Sets the transition-aware update-DOM callback.
    #[must_use]
    pub fn with_update_dom_transition(
        mut self,
        f: impl Fn(&mut VisualTree, ElementId, &Value, &Value) + 'static,
    ) -> Self {
        self.update_dom_transition = Some(Rc::new(f));
        self
    }

    /// Sets the changed callback.
    #[must_use]
    pub fn with_changed(
        mut self,
        f: impl Fn(&mut VisualTree, ElementId, &PropertyChange) + 'static,
    ) -> Self {
        self.changed = Some(Rc::new(f));
        self
    }

    /// Sets when the changed callback fires on load.
    #[must_use]
    pub fn with_fire_on_load(mut self, policy: FireOnLoad) -> Self {
        self.fire_on_load = policy;
        self
    }
}

/// Maps property ids to metadata, with optional per-element-type overrides.
///
/// Metadata is resolved once at registration (or override) time and handed
/// out as `Rc`, so callers can clone it and invoke callbacks while the tree
/// is mutably borrowed.
#[derive(Debug, Default)]
pub struct PropertyRegistry {
    base: Vec<Rc<PropertyMetadata>>,
    overrides: Vec<(PropertyId, TypeId, Rc<PropertyMetadata>)>,
}

impl PropertyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a property and returns its id.
    pub fn register(&mut self, metadata: PropertyMetadata) -> PropertyId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "property count is bounded by the application's registrations"
        )]
        let id = PropertyId(self.base.len() as u32);
        self.base.push(Rc::new(metadata));
        id
    }

    /// Replaces the metadata of `property` for elements whose behaviour is
    /// `T`. A later override for the same pair wins.
    ///
    /// # Panics
    ///
    /// Panics if `property` was not registered here.
    pub fn override_metadata<T: Element>(&mut self, property: PropertyId, metadata: PropertyMetadata) {
        self.validate(property);
        let type_id = TypeId::of::<T>();
        self.overrides
            .retain(|(p, t, _)| !(*p == property && *t == type_id));
        self.overrides.push((property, type_id, Rc::new(metadata)));
    }

    /// Returns the registration metadata of `property`.
    ///
    /// # Panics
    ///
    /// Panics if `property` was not registered here.
    #[must_use]
    pub fn metadata(&self, property: PropertyId) -> &Rc<PropertyMetadata> {
        self.validate(property);
        &self.base[property.0 as usize]
    }

    /// Returns the metadata that applies to `property` on an element whose
    /// behaviour has type id `element_type`.
    ///
    /// # Panics
    ///
    /// Panics if `property` was not registered here.
    #[must_use]
    pub fn metadata_for(&self, property: PropertyId, element_type: TypeId) -> Rc<PropertyMetadata> {
        self.overrides
            .iter()
            .find(|(p, t, _)| *p == property && *t == element_type)
            .map_or_else(|| Rc::clone(self.metadata(property)), |(_, _, m)| Rc::clone(m))
    }

    /// Returns the number of registered properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Returns whether no property has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    fn validate(&self, property: PropertyId) {
        assert!(
            (property.0 as usize) < self.base.len(),
            "unregistered {property:?} (registry holds {})",
            self.base.len()
        );
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property registration and per-element values.

use alloc::rc::Rc;

use crate::element::{Element, ElementId};
use crate::property::{
    EffectiveEntry, EffectiveValues, PropertyChange, PropertyId, PropertyMetadata, Resolution,
    Value, ValueSource,
};

use super::VisualTree;

impl VisualTree {
    /// Registers a property on this tree and returns its id.
    pub fn register_property(&mut self, metadata: PropertyMetadata) -> PropertyId {
        self.registry.register(metadata)
    }

    /// Replaces `property`'s metadata for elements whose behaviour is `T`.
    ///
    /// # Panics
    ///
    /// Panics if `property` is not registered on this tree.
    pub fn override_metadata<T: Element>(&mut self, property: PropertyId, metadata: PropertyMetadata) {
        self.registry.override_metadata::<T>(property, metadata);
    }

    /// Returns the metadata that applies to `property` on `element`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `property` is not registered.
    #[must_use]
    pub fn metadata_for(&self, element: ElementId, property: PropertyId) -> Rc<PropertyMetadata> {
        self.registry
            .metadata_for(property, self.behavior_type_id(element))
    }

    /// Sets a local value.
    ///
    /// See [`set_value_with_source`](Self::set_value_with_source).
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `property` is not registered.
    pub fn set_value(&mut self, element: ElementId, property: PropertyId, value: impl Into<Value>) {
        self.set_value_with_source(element, property, value, ValueSource::Local);
    }

    /// Stores `value` for `property` on `element`, coming from `source`.
    ///
    /// A value from a lower-precedence source than the stored one is
    /// ignored. Storing a value drops any coercion.
    ///
    /// If the effective value changes, live elements whose rendering is not
    /// deferred receive `update_dom(new)` and
    /// `update_dom_transition(old, new)` (unless a reconciliation pass over
    /// the element covers the property), then every element receives
    /// `changed(old → new)`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale, `property` is not registered, or
    /// `source` is [`ValueSource::Default`] (use
    /// [`clear_value`](Self::clear_value)).
    pub fn set_value_with_source(
        &mut self,
        element: ElementId,
        property: PropertyId,
        value: impl Into<Value>,
        source: ValueSource,
    ) {
        self.validate(element);
        assert!(
            source != ValueSource::Default,
            "default-sourced values are written by clear_value"
        );
        let i = element.idx as usize;
        if self.values[i]
            .get(property)
            .is_some_and(|entry| entry.source > source)
        {
            return;
        }

        let old = self.get_value(element, property, Resolution::FullyResolved);
        self.values[i].insert(property, EffectiveEntry::new(value.into(), source));
        let new = self.get_value(element, property, Resolution::FullyResolved);
        self.notify_change(element, property, old, new);
    }

    /// Replaces the effective value of `property` on `element` with
    /// `coerced`, leaving the base value alone. `None` removes the
    /// coercion.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `property` is not registered.
    pub fn coerce_value(&mut self, element: ElementId, property: PropertyId, coerced: Option<Value>) {
        self.validate(element);
        let i = element.idx as usize;
        let old = self.get_value(element, property, Resolution::FullyResolved);
        match self.values[i].get_mut(property) {
            Some(entry) => entry.coerced = coerced,
            None => {
                let default = self.registry.metadata(property).default_value.clone();
                let mut entry = EffectiveEntry::new(default, ValueSource::Default);
                entry.coerced = coerced;
                self.values[i].insert(property, entry);
            }
        }
        let new = self.get_value(element, property, Resolution::FullyResolved);
        self.notify_change(element, property, old, new);
    }

    /// Clears the value of `property` on `element`, reverting to the default.
    ///
    /// The entry keeps its position with source [`ValueSource::Default`], so
    /// reconciliation skips it.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `property` is not registered.
    pub fn clear_value(&mut self, element: ElementId, property: PropertyId) {
        self.validate(element);
        let i = element.idx as usize;
        if self.values[i].get(property).is_none() {
            return;
        }
        let old = self.get_value(element, property, Resolution::FullyResolved);
        let default = self.metadata_for(element, property).default_value.clone();
        self.values[i].insert(property, EffectiveEntry::new(default, ValueSource::Default));
        let new = self.get_value(element, property, Resolution::FullyResolved);
        self.notify_change(element, property, old, new);
    }

    /// Returns the value of `property` on `element`, falling back to the
    /// default that applies to the element's type.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or `property` is not registered.
    #[must_use]
    pub fn get_value(&self, element: ElementId, property: PropertyId, resolution: Resolution) -> Value {
        self.validate(element);
        match self.values[element.idx as usize].get(property) {
            Some(entry) => entry.resolve(resolution).clone(),
            None => self.metadata_for(element, property).default_value.clone(),
        }
    }

    /// Returns where the value of `property` on `element` comes from.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn value_source(&self, element: ElementId, property: PropertyId) -> ValueSource {
        self.validate(element);
        self.values[element.idx as usize]
            .get(property)
            .map_or(ValueSource::Default, |entry| entry.source)
    }

    /// Returns every value stored on `element`, including cleared ones.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn effective_entries(&self, element: ElementId) -> &EffectiveValues {
        self.validate(element);
        &self.values[element.idx as usize]
    }

    /// Returns whether a reconciliation pass over `element` covers `property`.
    ///
    /// Cleared values are skipped by the pass, so they are never covered.
    fn is_reconciling(&self, element: ElementId, property: PropertyId) -> bool {
        self.value_source(element, property) != ValueSource::Default
            && self
                .reconciling
                .iter()
                .any(|(id, properties)| *id == element && properties.contains(&property))
    }

    fn notify_change(&mut self, element: ElementId, property: PropertyId, old: Value, new: Value) {
        if old == new {
            return;
        }
        let metadata = self.metadata_for(element, property);
        if self.is_element_in_visual_tree(element)
            && !self.deferred[element.idx as usize]
            && !self.is_reconciling(element, property)
        {
            #[cfg(feature = "trace-rich")]
            self.tracer
                .property_update(&crate::trace::PropertyUpdateEvent {
                    element,
                    property,
                    name: metadata.name,
                    origin: crate::trace::PropertyUpdateOrigin::Change,
                });

            if let Some(update_dom) = &metadata.update_dom {
                update_dom(self, element, &new);
            }
            if let Some(update_dom_transition) = &metadata.update_dom_transition {
                update_dom_transition(self, element, &old, &new);
            }
        }
        if let Some(changed) = &metadata.changed
            && self.is_alive(element)
        {
            changed(
                self,
                element,
                &PropertyChange {
                    property,
                    old_value: old,
                    new_value: new,
                },
            );
        }
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Replaying stored property values into a freshly attached DOM node.

use crate::element::ElementId;
use crate::property::{FireOnLoad, PropertyChange, Resolution, Value, ValueSource};
use crate::trace::{ReconcileEvent, ReconcileTrigger, SpanKind};

use super::VisualTree;

impl VisualTree {
    /// Pushes every value set on `element` into its DOM node.
    ///
    /// The attach path calls this automatically; calling it again replays
    /// the same values.
    ///
    /// For each entry whose source is not [`ValueSource::Default`], in the
    /// order the entries were first stored, the property's metadata (with
    /// per-type overrides applied) receives:
    ///
    /// 1. `update_dom(value)` with the fully resolved value,
    /// 2. `update_dom_transition(Value::Unset, value)`,
    /// 3. `changed(value → value)` unless the metadata says
    ///    [`FireOnLoad::Never`] or the value equals the default.
    ///
    /// The set of properties is fixed when the pass starts, but each value is
    /// read when its property is visited: a callback that changes a property
    /// visited later is observed, one that changes an already visited
    /// property is not replayed. While the pass runs, changes to properties
    /// in that set only raise `changed`; their DOM callbacks fire once, from
    /// the pass.
    ///
    /// Nothing happens when the element has no DOM node.
    ///
    /// Finally, pointer events are enabled on the node if the element is
    /// hit-testable.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn reconcile_properties(&mut self, element: ElementId) {
        self.validate(element);
        if self.dom_node[element.idx as usize].is_none() {
            return;
        }
        self.reconcile(element, ReconcileTrigger::Explicit);
    }

    pub(crate) fn reconcile(&mut self, element: ElementId, trigger: ReconcileTrigger) {
        let i = element.idx as usize;
        let type_id = self.behavior_type_id(element);
        let properties = self.values[i].set_properties();

        self.span_begin(SpanKind::Reconcile, element);
        #[expect(
            clippy::cast_possible_truncation,
            reason = "property count is bounded by the registry"
        )]
        let entries = properties.len() as u32;
        self.tracer.reconcile(&ReconcileEvent {
            element,
            trigger,
            entries,
        });

        self.reconciling.push((element, properties.clone()));
        for property in properties {
            // A callback may have destroyed the element.
            if !self.is_alive(element) {
                break;
            }
            let Some(entry) = self.values[i].get(property) else {
                continue;
            };
            if entry.source == ValueSource::Default {
                continue;
            }
            let value = entry.resolve(Resolution::FullyResolved).clone();
            let metadata = self.registry.metadata_for(property, type_id);

            #[cfg(feature = "trace-rich")]
            self.tracer
                .property_update(&crate::trace::PropertyUpdateEvent {
                    element,
                    property,
                    name: metadata.name,
                    origin: crate::trace::PropertyUpdateOrigin::Reconcile,
                });

            if let Some(update_dom) = &metadata.update_dom {
                update_dom(self, element, &value);
            }
            if let Some(update_dom_transition) = &metadata.update_dom_transition {
                update_dom_transition(self, element, &Value::Unset, &value);
            }
            if let Some(changed) = &metadata.changed
                && metadata.fire_on_load != FireOnLoad::Never
                && value != metadata.default_value
            {
                changed(
                    self,
                    element,
                    &PropertyChange {
                        property,
                        old_value: value.clone(),
                        new_value: value,
                    },
                );
            }
        }
        self.reconciling.pop();

        if self.is_alive(element)
            && self.is_hit_testable(element)
            && let Some(node) = self.dom_node[i]
        {
            self.dom.set_pointer_events(node, true);
        }
        self.span_end(SpanKind::Reconcile, element);
    }
}

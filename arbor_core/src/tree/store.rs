// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays element storage, allocation, and accessors.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker};

use crate::config::TreeConfig;
use crate::dirty;
use crate::dom::{DomAdapter, DomHandle};
use crate::element::{Element, ElementId, HostId, INVALID, Visibility};
use crate::error::TreeError;
use crate::input::InputManager;
use crate::property::{EffectiveValues, PropertyId, PropertyRegistry};
use crate::trace::{SpanEvent, SpanKind, TraceSink, Tracer};

/// The retained tree of elements and its projection onto a DOM.
///
/// Elements are addressed by [`ElementId`] handles. Internally, each element
/// occupies a slot in parallel arrays. Destroyed elements are recycled via a
/// free list, and generation counters prevent stale handle access: every
/// public method taking an `ElementId` panics if the handle is stale.
///
/// The tree owns its collaborators: the [`DomAdapter`] that materialises
/// nodes, the [`PropertyRegistry`], the [`InputManager`], the
/// [`TreeConfig`], and an optional trace sink.
pub struct VisualTree {
    // -- Topology --
    pub(crate) visual_parent: Vec<u32>,
    pub(crate) visual_children: Vec<Option<Vec<ElementId>>>,

    // -- Attachment state --
    pub(crate) connected: Vec<bool>,
    pub(crate) unloading: Vec<bool>,
    pub(crate) loaded: Vec<bool>,
    pub(crate) deferred: Vec<bool>,
    pub(crate) dom_node: Vec<Option<DomHandle>>,
    pub(crate) host: Vec<Option<HostId>>,

    // -- Local state --
    pub(crate) visibility: Vec<Visibility>,
    pub(crate) hit_test_visible: Vec<bool>,
    pub(crate) values: Vec<EffectiveValues>,
    pub(crate) behavior: Vec<Option<Rc<dyn Element>>>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Reconciliation passes in progress, innermost last --
    pub(crate) reconciling: Vec<(ElementId, Vec<PropertyId>)>,

    // -- Collaborators --
    pub(crate) dom: Box<dyn DomAdapter>,
    pub(crate) registry: PropertyRegistry,
    pub(crate) input: InputManager,
    pub(crate) config: TreeConfig,
    pub(crate) tracer: Tracer,
}

impl fmt::Debug for VisualTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualTree")
            .field("elements", &self.element_count())
            .field("properties", &self.registry.len())
            .field("input", &self.input)
            .field("config", &self.config)
            .field("tracer", &self.tracer)
            .finish_non_exhaustive()
    }
}

impl VisualTree {
    /// Creates an empty tree that projects onto `dom`.
    #[must_use]
    pub fn new(config: TreeConfig, dom: Box<dyn DomAdapter>) -> Self {
        Self {
            visual_parent: Vec::new(),
            visual_children: Vec::new(),
            connected: Vec::new(),
            unloading: Vec::new(),
            loaded: Vec::new(),
            deferred: Vec::new(),
            dom_node: Vec::new(),
            host: Vec::new(),
            visibility: Vec::new(),
            hit_test_visible: Vec::new(),
            values: Vec::new(),
            behavior: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            reconciling: Vec::new(),
            dom,
            registry: PropertyRegistry::new(),
            input: InputManager::new(),
            config,
            tracer: Tracer::none(),
        }
    }

    /// Installs `sink` as the trace sink, replacing any previous one.
    ///
    /// Without the `trace` feature the sink is dropped immediately.
    #[must_use]
    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink>) -> Self {
        self.set_trace_sink(sink);
        self
    }

    /// Installs `sink` as the trace sink, replacing any previous one.
    pub fn set_trace_sink(&mut self, sink: Box<dyn TraceSink>) {
        self.tracer = Tracer::new(sink);
    }

    /// Borrows the installed trace sink if it is a `T`.
    #[must_use]
    pub fn trace_sink_as<T: TraceSink>(&self) -> Option<&T> {
        self.tracer.sink_as::<T>()
    }

    /// Removes the installed trace sink if it is a `T` and returns it.
    #[must_use]
    pub fn take_trace_sink_as<T: TraceSink>(&mut self) -> Option<Box<T>> {
        self.tracer.take_sink_as::<T>()
    }

    // -- Allocation API --

    /// Creates a new, unattached element with the given behaviour.
    ///
    /// The element starts visible, hit-testable, with no values and no
    /// parent.
    pub fn create_element(&mut self, behavior: impl Element) -> ElementId {
        let behavior: Rc<dyn Element> = Rc::new(behavior);
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot. The generation was bumped on destroy.
            let i = idx as usize;
            self.visual_parent[i] = INVALID;
            self.visual_children[i] = None;
            self.connected[i] = false;
            self.unloading[i] = false;
            self.loaded[i] = false;
            self.deferred[i] = false;
            self.dom_node[i] = None;
            self.host[i] = None;
            self.visibility[i] = Visibility::Visible;
            self.hit_test_visible[i] = true;
            self.values[i] = EffectiveValues::new();
            self.behavior[i] = Some(behavior);
            idx
        } else {
            // Allocate a new slot.
            let idx = self.len;
            self.len += 1;
            self.visual_parent.push(INVALID);
            self.visual_children.push(None);
            self.connected.push(false);
            self.unloading.push(false);
            self.loaded.push(false);
            self.deferred.push(false);
            self.dom_node.push(None);
            self.host.push(None);
            self.visibility.push(Visibility::Visible);
            self.hit_test_visible.push(true);
            self.values.push(EffectiveValues::new());
            self.behavior.push(Some(behavior));
            self.generation.push(0);
            idx
        };

        ElementId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Destroys an element, freeing its slot for reuse.
    ///
    /// The element's behaviour and stored values are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TreeError::StillAttached`] if the element is connected or
    /// recorded under a visual parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_element(&mut self, id: ElementId) -> Result<(), TreeError> {
        self.validate(id);
        let i = id.idx as usize;
        if self.connected[i] || self.visual_parent[i] != INVALID {
            return Err(TreeError::StillAttached {
                element: self.type_name(id),
            });
        }

        self.dirty.remove_key(id.idx);
        self.behavior[i] = None;
        self.values[i] = EffectiveValues::new();

        // Bump generation so old handles immediately fail validation.
        self.generation[i] += 1;
        self.free_list.push(id.idx);
        Ok(())
    }

    /// Returns whether the given handle refers to a live element.
    #[must_use]
    pub fn is_alive(&self, id: ElementId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && self.behavior[id.idx as usize].is_some()
    }

    /// Returns the number of live elements.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    // -- Behaviour API --

    /// Returns the element's behaviour.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn behavior(&self, id: ElementId) -> Rc<dyn Element> {
        self.validate(id);
        match &self.behavior[id.idx as usize] {
            Some(behavior) => Rc::clone(behavior),
            None => unreachable!("validated element without behaviour"),
        }
    }

    /// Returns the element's behaviour if it is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn behavior_as<T: Element>(&self, id: ElementId) -> Option<Rc<T>> {
        let behavior: Rc<dyn Any> = self.behavior(id);
        behavior.downcast::<T>().ok()
    }

    /// Returns whether the element's behaviour is a `T`.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_of_type<T: Element>(&self, id: ElementId) -> bool {
        self.behavior_type_id(id) == TypeId::of::<T>()
    }

    /// Returns the element's type name.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn type_name(&self, id: ElementId) -> &'static str {
        self.behavior(id).type_name()
    }

    pub(crate) fn behavior_type_id(&self, id: ElementId) -> TypeId {
        let behavior = self.behavior(id);
        let any: &dyn Any = &*behavior;
        any.type_id()
    }

    /// Clones the behaviour out of a slot that may have been destroyed by a
    /// reentrant callback.
    pub(crate) fn live_behavior(&self, id: ElementId) -> Option<Rc<dyn Element>> {
        if !self.is_alive(id) {
            return None;
        }
        self.behavior[id.idx as usize].clone()
    }

    // -- Attachment queries --

    /// Returns whether the element is connected and not being unloaded.
    ///
    /// Only elements in the visual tree accept children.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_element_in_visual_tree(&self, id: ElementId) -> bool {
        self.validate(id);
        let i = id.idx as usize;
        self.connected[i] && !self.unloading[i]
    }

    /// Returns whether the element is connected to a live tree.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_connected(&self, id: ElementId) -> bool {
        self.validate(id);
        self.connected[id.idx as usize]
    }

    /// Returns whether the element's subtree is being torn down.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_unloading(&self, id: ElementId) -> bool {
        self.validate(id);
        self.unloading[id.idx as usize]
    }

    /// Returns whether the element has been loaded and not yet unloaded.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn is_loaded(&self, id: ElementId) -> bool {
        self.validate(id);
        self.loaded[id.idx as usize]
    }

    /// Returns whether the element's property reconciliation is waiting for
    /// it to become visible.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn rendering_is_deferred(&self, id: ElementId) -> bool {
        self.validate(id);
        self.deferred[id.idx as usize]
    }

    /// Returns the element's visual parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visual_parent(&self, id: ElementId) -> Option<ElementId> {
        self.validate(id);
        self.id_at(self.visual_parent[id.idx as usize])
    }

    /// Returns the children attached under the element, in attach order.
    ///
    /// `None` means no child was ever recorded since the element was last
    /// connected, which is distinct from an empty list.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn visual_children(&self, id: ElementId) -> Option<&[ElementId]> {
        self.validate(id);
        self.visual_children[id.idx as usize].as_deref()
    }

    /// Returns the element's DOM node, if connected.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn dom_handle(&self, id: ElementId) -> Option<DomHandle> {
        self.validate(id);
        self.dom_node[id.idx as usize]
    }

    /// Returns the host the element is displayed in, if connected.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    #[must_use]
    pub fn host(&self, id: ElementId) -> Option<HostId> {
        self.validate(id);
        self.host[id.idx as usize]
    }

    // -- Collaborators --

    /// Returns the tree's configuration.
    #[must_use]
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Returns the focus and capture state.
    #[must_use]
    pub fn input(&self) -> &InputManager {
        &self.input
    }

    /// Returns the property registry.
    #[must_use]
    pub fn registry(&self) -> &PropertyRegistry {
        &self.registry
    }

    /// Returns the DOM adapter.
    ///
    /// Property callbacks use this to write styles onto an element's node.
    pub fn dom_mut(&mut self) -> &mut dyn DomAdapter {
        &mut *self.dom
    }

    /// Borrows the DOM adapter if it is a `T`.
    #[must_use]
    pub fn dom_as<T: DomAdapter>(&self) -> Option<&T> {
        let dom: &dyn Any = &*self.dom;
        dom.downcast_ref::<T>()
    }

    /// Mutably borrows the DOM adapter if it is a `T`.
    pub fn dom_as_mut<T: DomAdapter>(&mut self) -> Option<&mut T> {
        let dom: &mut dyn Any = &mut *self.dom;
        dom.downcast_mut::<T>()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ElementId) {
        assert!(
            self.is_alive(id),
            "stale ElementId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Rebuilds a handle for a slot index, or `None` for [`INVALID`].
    pub(crate) fn id_at(&self, idx: u32) -> Option<ElementId> {
        (idx != INVALID).then(|| ElementId {
            idx,
            generation: self.generation[idx as usize],
        })
    }

    /// Records `child` under `parent` and adds the visibility dependency.
    pub(crate) fn link_child(&mut self, parent: ElementId, child: ElementId) {
        let list = self.visual_children[parent.idx as usize].get_or_insert_with(Vec::new);
        if !list.contains(&child) {
            list.push(child);
        }
        self.visual_parent[child.idx as usize] = parent.idx;
        let _ = self
            .dirty
            .add_dependency(child.idx, parent.idx, dirty::VISIBILITY);
    }

    /// Removes `child` from `parent`'s list and clears the parent link.
    pub(crate) fn unlink_child(&mut self, parent: ElementId, child: ElementId) {
        if let Some(list) = &mut self.visual_children[parent.idx as usize] {
            list.retain(|&c| c != child);
        }
        self.clear_parent_link(child);
    }

    /// Clears `child`'s parent link and its visibility dependency.
    pub(crate) fn clear_parent_link(&mut self, child: ElementId) {
        let c = child.idx;
        let p = self.visual_parent[c as usize];
        if p != INVALID {
            self.dirty.remove_dependency(c, p, dirty::VISIBILITY);
            self.visual_parent[c as usize] = INVALID;
        }
    }

    /// Returns whether `child` is recorded in `parent`'s child list.
    pub(crate) fn is_listed_under(&self, child: ElementId, parent: ElementId) -> bool {
        self.visual_children[parent.idx as usize]
            .as_ref()
            .is_some_and(|list| list.contains(&child))
    }

    /// Emits a span-begin event when performance logging is on.
    pub(crate) fn span_begin(&mut self, kind: SpanKind, element: ElementId) {
        if self.config.performance_logging {
            self.tracer.span_begin(&SpanEvent { kind, element });
        }
    }

    /// Emits a span-end event when performance logging is on.
    pub(crate) fn span_end(&mut self, kind: SpanKind, element: ElementId) {
        if self.config.performance_logging {
            self.tracer.span_end(&SpanEvent { kind, element });
        }
    }
}

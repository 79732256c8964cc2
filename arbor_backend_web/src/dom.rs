// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element management.
//!
//! [`WebDom`] owns one `<div>` per connected element and hands the tree
//! generational [`DomHandle`]s for them. Native input listeners push
//! [`InputEvent`]s into a queue that the host drains between frames.

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use arbor_core::dom::{DomAdapter, DomError, DomHandle};
use arbor_core::element::ElementId;
use wasm_bindgen::JsCast as _;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Event, HtmlElement, Node};

/// Native event types routed to elements.
pub const INPUT_EVENTS: [&str; 6] = [
    "pointerdown",
    "pointerup",
    "pointermove",
    "wheel",
    "keydown",
    "keyup",
];

/// A native input event captured on an element's DOM node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputEvent {
    /// The element whose node received the event.
    pub element: ElementId,
    /// The DOM event type, one of [`INPUT_EVENTS`].
    pub event_type: String,
}

type Listener = Closure<dyn FnMut(Event)>;

struct Slot {
    element: HtmlElement,
    /// One closure registered for every type in [`INPUT_EVENTS`].
    listener: Option<Listener>,
    registered: Option<ElementId>,
}

impl Slot {
    fn drop_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            for ty in INPUT_EVENTS {
                let _ = self
                    .element
                    .remove_event_listener_with_callback(ty, listener.as_ref().unchecked_ref());
            }
        }
    }
}

/// A [`DomAdapter`] backed by the browser document.
///
/// Host containers enter through [`adopt_host`](Self::adopt_host); every
/// other node is a `<div>` created on demand. A slot is released when its
/// node is removed or unregistered, whichever comes first, and released
/// slots are reused with a bumped generation.
pub struct WebDom {
    document: Document,
    slots: Vec<Option<Slot>>,
    generation: Vec<u32>,
    free_list: Vec<u32>,
    queue: Rc<RefCell<Vec<InputEvent>>>,
}

impl core::fmt::Debug for WebDom {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("WebDom")
            .field("document", &"Document")
            .field("slots_len", &self.slots.len())
            .field("free", &self.free_list.len())
            .field("queued_events", &self.queue.borrow().len())
            .finish_non_exhaustive()
    }
}

impl WebDom {
    /// Creates an adapter that creates nodes in `document`.
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            document,
            slots: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            queue: Rc::default(),
        }
    }

    /// Creates an adapter for the current window's document.
    ///
    /// # Errors
    ///
    /// Fails outside a browser window (for instance in a worker).
    pub fn from_window() -> Result<Self, DomError> {
        web_sys::window()
            .and_then(|w| w.document())
            .map(Self::new)
            .ok_or_else(|| DomError::new("no window document"))
    }

    /// Hands out a handle for an existing container, to be passed to
    /// [`VisualTree::attach_root`](arbor_core::tree::VisualTree::attach_root).
    ///
    /// The container is never removed from the document by this adapter.
    pub fn adopt_host(&mut self, container: HtmlElement) -> DomHandle {
        self.alloc(container)
    }

    /// Returns the element for `node`, if it is still held.
    #[must_use]
    pub fn element(&self, node: DomHandle) -> Option<&HtmlElement> {
        self.slot(node).map(|s| &s.element)
    }

    /// Returns the element registered for `node`.
    #[must_use]
    pub fn registered_element(&self, node: DomHandle) -> Option<ElementId> {
        self.slot(node)?.registered
    }

    /// Takes every input event received since the last call, oldest first.
    pub fn drain_input_events(&mut self) -> Vec<InputEvent> {
        core::mem::take(&mut *self.queue.borrow_mut())
    }

    fn slot(&self, node: DomHandle) -> Option<&Slot> {
        if self.generation.get(node.idx as usize) != Some(&node.generation) {
            return None;
        }
        self.slots[node.idx as usize].as_ref()
    }

    fn slot_mut(&mut self, node: DomHandle) -> Option<&mut Slot> {
        if self.generation.get(node.idx as usize) != Some(&node.generation) {
            return None;
        }
        self.slots[node.idx as usize].as_mut()
    }

    fn alloc(&mut self, element: HtmlElement) -> DomHandle {
        let slot = Slot {
            element,
            listener: None,
            registered: None,
        };
        let idx = if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(slot);
            idx
        } else {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a document never holds u32::MAX arbor nodes"
            )]
            let idx = self.slots.len() as u32;
            self.slots.push(Some(slot));
            self.generation.push(0);
            idx
        };
        DomHandle::new(idx, self.generation[idx as usize])
    }

    /// Releases `node`'s slot. The element itself is left where it is.
    fn release(&mut self, node: DomHandle) -> Option<HtmlElement> {
        self.slot(node)?;
        let i = node.idx as usize;
        let mut slot = self.slots[i].take()?;
        slot.drop_listener();
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.free_list.push(node.idx);
        Some(slot.element)
    }
}

fn js_error(err: JsValue) -> DomError {
    DomError::new(format!("{err:?}"))
}

impl DomAdapter for WebDom {
    fn create_dom_node(
        &mut self,
        parent: DomHandle,
        _element: ElementId,
        index: Option<usize>,
    ) -> Result<DomHandle, DomError> {
        let parent = self
            .element(parent)
            .ok_or_else(|| DomError::new("parent DOM node has been removed"))?
            .clone();
        let el: HtmlElement = self
            .document
            .create_element("div")
            .map_err(js_error)?
            .unchecked_into();

        let reference = index
            .and_then(|i| u32::try_from(i).ok())
            .and_then(|i| parent.children().item(i));
        match reference {
            Some(reference) => {
                let reference: &Node = reference.as_ref();
                parent.insert_before(&el, Some(reference)).map_err(js_error)?;
            }
            None => {
                parent.append_child(&el).map_err(js_error)?;
            }
        }
        Ok(self.alloc(el))
    }

    fn remove_dom_node(&mut self, node: DomHandle) {
        if let Some(el) = self.release(node) {
            el.remove();
        }
    }

    fn set_visible(&mut self, node: DomHandle, visible: bool) {
        if let Some(slot) = self.slot(node) {
            let s = slot.element.style();
            if visible {
                let _ = s.remove_property("display");
            } else {
                let _ = s.set_property("display", "none");
            }
        }
    }

    fn set_pointer_events(&mut self, node: DomHandle, enabled: bool) {
        if let Some(slot) = self.slot(node) {
            let value = if enabled { "auto" } else { "none" };
            let _ = slot.element.style().set_property("pointer-events", value);
        }
    }

    fn set_style(&mut self, node: DomHandle, property: &str, value: &str) {
        if let Some(slot) = self.slot(node) {
            let s = slot.element.style();
            if value.is_empty() {
                let _ = s.remove_property(property);
            } else {
                let _ = s.set_property(property, value);
            }
        }
    }

    fn add_css_class(&mut self, node: DomHandle, class: &str) {
        if let Some(slot) = self.slot(node) {
            let _ = slot.element.class_list().add_1(class);
        }
    }

    fn attach_input_listeners(&mut self, node: DomHandle, element: ElementId) {
        let queue = Rc::clone(&self.queue);
        let Some(slot) = self.slot_mut(node) else {
            return;
        };
        slot.drop_listener();
        let listener = Closure::wrap(Box::new(move |event: Event| {
            queue.borrow_mut().push(InputEvent {
                element,
                event_type: event.type_(),
            });
        }) as Box<dyn FnMut(Event)>);
        for ty in INPUT_EVENTS {
            let _ = slot
                .element
                .add_event_listener_with_callback(ty, listener.as_ref().unchecked_ref());
        }
        slot.listener = Some(listener);
    }

    fn detach_input_listeners(&mut self, node: DomHandle, _element: ElementId) {
        if let Some(slot) = self.slot_mut(node) {
            slot.drop_listener();
        }
    }

    fn register_globally(&mut self, node: DomHandle, element: ElementId) {
        if let Some(slot) = self.slot_mut(node) {
            slot.registered = Some(element);
        }
    }

    fn unregister_globally(&mut self, node: DomHandle) {
        // Teardown makes this call last for a node; nothing refers to it afterwards.
        let _ = self.release(node);
    }
}

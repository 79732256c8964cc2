// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for tree mutations.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! attach, detach, and reconciliation paths call at each step. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] owns an optional boxed [`TraceSink`] and lives inside the
//! [`VisualTree`](crate::tree::VisualTree). When the `trace` feature is
//! **off**, every `Tracer` method compiles to nothing and installed sinks are
//! dropped. When **on**, each method performs a single `Option` branch before
//! dispatching.
//!
//! Span events are emitted only when
//! [`TreeConfig::performance_logging`](crate::config::TreeConfig) is set.
//! The core has no clock; sinks that care about durations stamp events on
//! receipt.
//!
//! # Crate features
//!
//! - `trace` enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) gates [`PropertyUpdateEvent`] and the
//!   corresponding `TraceSink` method.

use alloc::boxed::Box;
use core::any::Any;

use crate::element::ElementId;
#[cfg(feature = "trace-rich")]
use crate::property::PropertyId;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// How an attach ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttachOutcome {
    /// Properties were reconciled and `Loaded` was raised.
    Completed,
    /// The element is not effectively visible; reconciliation is postponed
    /// until it becomes visible. `Loaded` was still raised.
    Deferred,
    /// The element was detached or re-attached from inside its own
    /// `on_attached` hook; the outer attach stopped without raising `Loaded`.
    Superseded,
}

/// What kind of detach ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetachKind {
    /// The element was live: its DOM node was removed and the whole subtree
    /// was torn down.
    Full,
    /// The element was listed under the parent but not live; only the
    /// bookkeeping was undone.
    LogicalOnly,
}

/// Which lifecycle notification was delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LifecyclePhase {
    /// `Element::on_attached`.
    Attached,
    /// `Element::on_loaded`.
    Loaded,
    /// `Element::on_detached`.
    Detached,
    /// `Element::on_unloaded`.
    Unloaded,
}

/// Why a reconciliation pass ran.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReconcileTrigger {
    /// The element was just attached.
    Attach,
    /// The element had deferred rendering and became visible.
    DeferredResolved,
    /// Requested through
    /// [`VisualTree::reconcile_properties`](crate::tree::VisualTree::reconcile_properties).
    Explicit,
}

/// Which operation a performance span covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpanKind {
    /// One `attach_visual_child` or `attach_root` call.
    Attach,
    /// One `detach_visual_child` or `detach_root` call.
    Detach,
    /// One reconciliation pass.
    Reconcile,
}

/// Which path pushed a property value to the DOM.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PropertyUpdateOrigin {
    /// Replayed by a reconciliation pass.
    Reconcile,
    /// A live value change.
    Change,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when an attach starts mutating the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachEvent {
    /// The element being attached.
    pub element: ElementId,
    /// Its new visual parent, or `None` for a root.
    pub parent: Option<ElementId>,
    /// The element's type name.
    pub type_name: &'static str,
    /// Requested DOM insertion index, if any.
    pub index: Option<usize>,
}

/// Emitted when an attach returns successfully.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachEndEvent {
    /// The element that was attached.
    pub element: ElementId,
    /// How the attach ended.
    pub outcome: AttachOutcome,
}

/// Emitted when a detach starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DetachEvent {
    /// The element being detached.
    pub element: ElementId,
    /// The parent it is detached from, or `None` for a root.
    pub parent: Option<ElementId>,
    /// Whether the subtree was live.
    pub kind: DetachKind,
}

/// Emitted right before a lifecycle hook runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// The element receiving the notification.
    pub element: ElementId,
    /// Which notification.
    pub phase: LifecyclePhase,
}

/// Emitted when a reconciliation pass starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconcileEvent {
    /// The element being reconciled.
    pub element: ElementId,
    /// Why the pass runs.
    pub trigger: ReconcileTrigger,
    /// Number of non-default entries in the snapshot.
    pub entries: u32,
}

/// Marks the beginning or end of a timed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpanEvent {
    /// Which operation.
    pub kind: SpanKind,
    /// The element the operation was invoked on.
    pub element: ElementId,
}

/// Emitted once per property value pushed into the DOM (requires
/// `trace-rich`).
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PropertyUpdateEvent {
    /// The element whose DOM node is updated.
    pub element: ElementId,
    /// The property being pushed.
    pub property: PropertyId,
    /// The property's registered name.
    pub name: &'static str,
    /// Which path pushed it.
    pub origin: PropertyUpdateOrigin,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the visual tree.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about. Sinks are `'static` so that a tree can
/// hand them back by concrete type (see [`Tracer::take_sink_as`]).
pub trait TraceSink: Any {
    /// Called when an attach starts.
    fn on_attach(&mut self, e: &AttachEvent) {
        _ = e;
    }

    /// Called when an attach returns successfully.
    fn on_attach_end(&mut self, e: &AttachEndEvent) {
        _ = e;
    }

    /// Called when a detach starts.
    fn on_detach(&mut self, e: &DetachEvent) {
        _ = e;
    }

    /// Called right before a lifecycle hook.
    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        _ = e;
    }

    /// Called when a reconciliation pass starts.
    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        _ = e;
    }

    /// Called at the beginning of a timed operation.
    fn on_span_begin(&mut self, e: &SpanEvent) {
        _ = e;
    }

    /// Called at the end of a timed operation.
    fn on_span_end(&mut self, e: &SpanEvent) {
        _ = e;
    }

    /// Called for each property value pushed into the DOM (requires
    /// `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_property_update(&mut self, e: &PropertyUpdateEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Owner of an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer")
            .field("enabled", &self.is_enabled())
            .finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: Box<dyn TraceSink>) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Removes and returns the installed sink.
    #[must_use]
    pub fn take_sink(&mut self) -> Option<Box<dyn TraceSink>> {
        #[cfg(feature = "trace")]
        {
            self.sink.take()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Removes and returns the installed sink if it is a `T`.
    ///
    /// A sink of another type stays installed.
    #[must_use]
    pub fn take_sink_as<T: TraceSink>(&mut self) -> Option<Box<T>> {
        self.sink_as::<T>()?;
        let sink: Box<dyn Any> = self.take_sink()?;
        sink.downcast::<T>().ok()
    }

    /// Borrows the installed sink if it is a `T`.
    #[must_use]
    pub fn sink_as<T: TraceSink>(&self) -> Option<&T> {
        #[cfg(feature = "trace")]
        {
            let sink: &dyn Any = self.sink.as_deref()?;
            sink.downcast_ref::<T>()
        }
        #[cfg(not(feature = "trace"))]
        {
            None
        }
    }

    /// Emits an [`AttachEvent`].
    #[inline]
    pub fn attach(&mut self, e: &AttachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attach(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an [`AttachEndEvent`].
    #[inline]
    pub fn attach_end(&mut self, e: &AttachEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_attach_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`DetachEvent`].
    #[inline]
    pub fn detach(&mut self, e: &DetachEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_detach(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`LifecycleEvent`].
    #[inline]
    pub fn lifecycle(&mut self, e: &LifecycleEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_lifecycle(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ReconcileEvent`].
    #[inline]
    pub fn reconcile(&mut self, e: &ReconcileEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_reconcile(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a span-begin [`SpanEvent`].
    #[inline]
    pub fn span_begin(&mut self, e: &SpanEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_span_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a span-end [`SpanEvent`].
    #[inline]
    pub fn span_end(&mut self, e: &SpanEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_span_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PropertyUpdateEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn property_update(&mut self, e: &PropertyUpdateEvent) {
        if let Some(s) = &mut self.sink {
            s.on_property_update(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

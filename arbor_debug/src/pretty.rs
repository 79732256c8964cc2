// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Lines inside
//! a performance span are indented by the span depth.

use std::io::Write;

use arbor_core::element::ElementId;
use arbor_core::trace::{
    AttachEndEvent, AttachEvent, DetachEvent, LifecycleEvent, PropertyUpdateEvent,
    ReconcileEvent, SpanEvent, TraceSink,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    depth: usize,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer, depth: 0 }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer, depth: 0 }
    }

    /// Consumes the sink and returns its writer.
    #[must_use]
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        let _ = writeln!(self.writer, "{:width$}{text}", "", width = self.depth * 2);
    }
}

fn parent(parent: Option<ElementId>) -> String {
    parent.map_or_else(|| "host".to_owned(), |p| format!("{p:?}"))
}

impl<W: Write + 'static> TraceSink for PrettyPrintSink<W> {
    fn on_attach(&mut self, e: &AttachEvent) {
        let index = e.index.map_or_else(|| "end".to_owned(), |i| i.to_string());
        self.line(format_args!(
            "[attach] {:?} {} under {} at {index}",
            e.element,
            e.type_name,
            parent(e.parent),
        ));
    }

    fn on_attach_end(&mut self, e: &AttachEndEvent) {
        self.line(format_args!("[attach:end] {:?} {:?}", e.element, e.outcome));
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        self.line(format_args!(
            "[detach] {:?} from {} ({:?})",
            e.element,
            parent(e.parent),
            e.kind,
        ));
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.line(format_args!("[lifecycle] {:?} {:?}", e.element, e.phase));
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.line(format_args!(
            "[reconcile] {:?} {:?} entries={}",
            e.element, e.trigger, e.entries,
        ));
    }

    fn on_span_begin(&mut self, e: &SpanEvent) {
        self.line(format_args!("[span:begin] {:?} {:?}", e.kind, e.element));
        self.depth += 1;
    }

    fn on_span_end(&mut self, e: &SpanEvent) {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("[span:end] {:?} {:?}", e.kind, e.element));
    }

    fn on_property_update(&mut self, e: &PropertyUpdateEvent) {
        self.line(format_args!(
            "[property] {:?} {} ({:?}) via {:?}",
            e.element, e.name, e.property, e.origin,
        ));
    }
}

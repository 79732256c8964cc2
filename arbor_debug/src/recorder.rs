// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a
//! `Vec<u8>` as little-endian records. Every record starts with a tag byte
//! and the receipt time in microseconds since the recorder was created.
//! [`decode`] reads them back as an iterator of [`Record`].
//!
//! Type and property names are stored as length-prefixed UTF-8, so decoded
//! events own their strings.

use std::time::Instant;

use arbor_core::element::ElementId;
use arbor_core::trace::{
    AttachEndEvent, AttachEvent, AttachOutcome, DetachEvent, DetachKind, LifecycleEvent,
    LifecyclePhase, PropertyUpdateEvent, PropertyUpdateOrigin, ReconcileEvent, ReconcileTrigger,
    SpanEvent, SpanKind, TraceSink,
};

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_ATTACH: u8 = 1;
const TAG_ATTACH_END: u8 = 2;
const TAG_DETACH: u8 = 3;
const TAG_LIFECYCLE: u8 = 4;
const TAG_RECONCILE: u8 = 5;
const TAG_SPAN_BEGIN: u8 = 6;
const TAG_SPAN_END: u8 = 7;
const TAG_PROPERTY_UPDATE: u8 = 8;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug)]
pub struct RecorderSink {
    buf: Vec<u8>,
    epoch: Instant,
}

impl Default for RecorderSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecorderSink {
    /// Creates an empty recorder. Timestamps count from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            epoch: Instant::now(),
        }
    }

    /// Returns a view of the recorded bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Consumes the recorder and returns the recorded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // -- encoding helpers --------------------------------------------------

    fn begin(&mut self, tag: u8) {
        let micros = u64::try_from(self.epoch.elapsed().as_micros()).unwrap_or(u64::MAX);
        self.write_u8(tag);
        self.write_u64(micros);
    }

    fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    fn write_element(&mut self, id: ElementId) {
        self.write_u32(id.index());
        self.write_u32(id.generation());
    }

    fn write_option_element(&mut self, id: Option<ElementId>) {
        match id {
            Some(id) => {
                self.write_u8(1);
                self.write_element(id);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_option_u64(&mut self, v: Option<u64>) {
        match v {
            Some(val) => {
                self.write_u8(1);
                self.write_u64(val);
            }
            None => {
                self.write_u8(0);
                self.write_u64(0);
            }
        }
    }

    fn write_str(&mut self, s: &str) {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "names longer than u32::MAX bytes are truncated for recording"
        )]
        let len = s.len().min(u32::MAX as usize) as u32;
        self.write_u32(len);
        self.buf.extend_from_slice(&s.as_bytes()[..len as usize]);
    }
}

impl TraceSink for RecorderSink {
    fn on_attach(&mut self, e: &AttachEvent) {
        self.begin(TAG_ATTACH);
        self.write_element(e.element);
        self.write_option_element(e.parent);
        self.write_option_u64(e.index.map(|i| i as u64));
        self.write_str(e.type_name);
    }

    fn on_attach_end(&mut self, e: &AttachEndEvent) {
        self.begin(TAG_ATTACH_END);
        self.write_element(e.element);
        self.write_u8(match e.outcome {
            AttachOutcome::Completed => 0,
            AttachOutcome::Deferred => 1,
            AttachOutcome::Superseded => 2,
        });
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        self.begin(TAG_DETACH);
        self.write_element(e.element);
        self.write_option_element(e.parent);
        self.write_u8(match e.kind {
            DetachKind::Full => 0,
            DetachKind::LogicalOnly => 1,
        });
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.begin(TAG_LIFECYCLE);
        self.write_element(e.element);
        self.write_u8(match e.phase {
            LifecyclePhase::Attached => 0,
            LifecyclePhase::Loaded => 1,
            LifecyclePhase::Detached => 2,
            LifecyclePhase::Unloaded => 3,
        });
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.begin(TAG_RECONCILE);
        self.write_element(e.element);
        self.write_u8(match e.trigger {
            ReconcileTrigger::Attach => 0,
            ReconcileTrigger::DeferredResolved => 1,
            ReconcileTrigger::Explicit => 2,
        });
        self.write_u32(e.entries);
    }

    fn on_span_begin(&mut self, e: &SpanEvent) {
        self.begin(TAG_SPAN_BEGIN);
        self.write_span(e);
    }

    fn on_span_end(&mut self, e: &SpanEvent) {
        self.begin(TAG_SPAN_END);
        self.write_span(e);
    }

    fn on_property_update(&mut self, e: &PropertyUpdateEvent) {
        self.begin(TAG_PROPERTY_UPDATE);
        self.write_element(e.element);
        self.write_u32(e.property.index());
        self.write_u8(match e.origin {
            PropertyUpdateOrigin::Reconcile => 0,
            PropertyUpdateOrigin::Change => 1,
        });
        self.write_str(e.name);
    }
}

impl RecorderSink {
    fn write_span(&mut self, e: &SpanEvent) {
        self.write_u8(match e.kind {
            SpanKind::Attach => 0,
            SpanKind::Detach => 1,
            SpanKind::Reconcile => 2,
        });
        self.write_element(e.element);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// An [`AttachEvent`], with an owned type name.
    Attach {
        /// The element being attached.
        element: ElementId,
        /// Its new visual parent, or `None` for a root.
        parent: Option<ElementId>,
        /// Requested DOM insertion index, if any.
        index: Option<u64>,
        /// The element's type name.
        type_name: String,
    },
    /// An [`AttachEndEvent`].
    AttachEnd(AttachEndEvent),
    /// A [`DetachEvent`].
    Detach(DetachEvent),
    /// A [`LifecycleEvent`].
    Lifecycle(LifecycleEvent),
    /// A [`ReconcileEvent`].
    Reconcile(ReconcileEvent),
    /// The start of a [`SpanEvent`].
    SpanBegin(SpanEvent),
    /// The end of a [`SpanEvent`].
    SpanEnd(SpanEvent),
    /// A [`PropertyUpdateEvent`], with an owned property name.
    PropertyUpdate {
        /// The element whose DOM node was updated.
        element: ElementId,
        /// Raw index of the property.
        property: u32,
        /// Which path pushed the value.
        origin: PropertyUpdateOrigin,
        /// The property's registered name.
        name: String,
    },
}

/// One decoded record: an event and when the recorder received it.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    /// Microseconds between the recorder's creation and the event.
    pub timestamp_us: u64,
    /// The event.
    pub event: RecordedEvent,
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`Record`].
///
/// Iteration stops at the first unknown tag or truncated record.
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded records.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn take(&mut self, n: usize) -> Option<&[u8]> {
        let bytes = self.data.get(self.pos..self.pos.checked_add(n)?)?;
        self.pos += n;
        Some(bytes)
    }

    fn read_u8(&mut self) -> Option<u8> {
        Some(self.take(1)?[0])
    }

    fn read_u32(&mut self) -> Option<u32> {
        Some(u32::from_le_bytes(self.take(4)?.try_into().ok()?))
    }

    fn read_u64(&mut self) -> Option<u64> {
        Some(u64::from_le_bytes(self.take(8)?.try_into().ok()?))
    }

    fn read_element(&mut self) -> Option<ElementId> {
        let idx = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(ElementId::from_raw_parts(idx, generation))
    }

    fn read_option_element(&mut self) -> Option<Option<ElementId>> {
        let present = self.read_u8()?;
        let id = self.read_element()?;
        Some((present != 0).then_some(id))
    }

    fn read_option_u64(&mut self) -> Option<Option<u64>> {
        let present = self.read_u8()?;
        let val = self.read_u64()?;
        Some((present != 0).then_some(val))
    }

    fn read_string(&mut self) -> Option<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        Some(String::from_utf8_lossy(bytes).into_owned())
    }

    fn read_span(&mut self) -> Option<SpanEvent> {
        let kind = match self.read_u8()? {
            0 => SpanKind::Attach,
            1 => SpanKind::Detach,
            _ => SpanKind::Reconcile,
        };
        Some(SpanEvent {
            kind,
            element: self.read_element()?,
        })
    }

    fn decode_attach(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Attach {
            element: self.read_element()?,
            parent: self.read_option_element()?,
            index: self.read_option_u64()?,
            type_name: self.read_string()?,
        })
    }

    fn decode_attach_end(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::AttachEnd(AttachEndEvent {
            element: self.read_element()?,
            outcome: match self.read_u8()? {
                0 => AttachOutcome::Completed,
                1 => AttachOutcome::Deferred,
                _ => AttachOutcome::Superseded,
            },
        }))
    }

    fn decode_detach(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Detach(DetachEvent {
            element: self.read_element()?,
            parent: self.read_option_element()?,
            kind: match self.read_u8()? {
                0 => DetachKind::Full,
                _ => DetachKind::LogicalOnly,
            },
        }))
    }

    fn decode_lifecycle(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Lifecycle(LifecycleEvent {
            element: self.read_element()?,
            phase: match self.read_u8()? {
                0 => LifecyclePhase::Attached,
                1 => LifecyclePhase::Loaded,
                2 => LifecyclePhase::Detached,
                _ => LifecyclePhase::Unloaded,
            },
        }))
    }

    fn decode_reconcile(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::Reconcile(ReconcileEvent {
            element: self.read_element()?,
            trigger: match self.read_u8()? {
                0 => ReconcileTrigger::Attach,
                1 => ReconcileTrigger::DeferredResolved,
                _ => ReconcileTrigger::Explicit,
            },
            entries: self.read_u32()?,
        }))
    }

    fn decode_property_update(&mut self) -> Option<RecordedEvent> {
        Some(RecordedEvent::PropertyUpdate {
            element: self.read_element()?,
            property: self.read_u32()?,
            origin: match self.read_u8()? {
                0 => PropertyUpdateOrigin::Reconcile,
                _ => PropertyUpdateOrigin::Change,
            },
            name: self.read_string()?,
        })
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = Record;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        let timestamp_us = self.read_u64()?;
        let event = match tag {
            TAG_ATTACH => self.decode_attach(),
            TAG_ATTACH_END => self.decode_attach_end(),
            TAG_DETACH => self.decode_detach(),
            TAG_LIFECYCLE => self.decode_lifecycle(),
            TAG_RECONCILE => self.decode_reconcile(),
            TAG_SPAN_BEGIN => self.read_span().map(RecordedEvent::SpanBegin),
            TAG_SPAN_END => self.read_span().map(RecordedEvent::SpanEnd),
            TAG_PROPERTY_UPDATE => self.decode_property_update(),
            _ => None, // unknown tag → stop iteration
        }?;
        Some(Record {
            timestamp_us,
            event,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

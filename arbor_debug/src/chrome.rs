// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][spec] JSON to the given writer.
//!
//! Performance spans become duration events (`B`/`E`); everything else is an
//! instant event on the same track.
//!
//! [spec]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use std::io::{self, Write};

use arbor_core::trace::SpanEvent;
use serde_json::{Value, json};

use crate::recorder::{Record, RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let events: Vec<Value> = decode(bytes).map(to_json).collect();
    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn instant(name: &str, cat: &str, ts: u64, args: Value) -> Value {
    json!({
        "ph": "i",
        "name": name,
        "cat": cat,
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "s": "t",
        "args": args,
    })
}

fn span(ph: &str, e: &SpanEvent, ts: u64) -> Value {
    json!({
        "ph": ph,
        "name": format!("{:?}", e.kind),
        "cat": "Span",
        "ts": ts,
        "pid": 0,
        "tid": 0,
        "args": { "element": format!("{:?}", e.element) },
    })
}

fn to_json(record: Record) -> Value {
    let ts = record.timestamp_us;
    match record.event {
        RecordedEvent::Attach {
            element,
            parent,
            index,
            type_name,
        } => instant(
            "Attach",
            "Tree",
            ts,
            json!({
                "element": format!("{element:?}"),
                "parent": parent.map(|p| format!("{p:?}")),
                "index": index,
                "type": type_name,
            }),
        ),
        RecordedEvent::AttachEnd(e) => instant(
            "AttachEnd",
            "Tree",
            ts,
            json!({
                "element": format!("{:?}", e.element),
                "outcome": format!("{:?}", e.outcome),
            }),
        ),
        RecordedEvent::Detach(e) => instant(
            "Detach",
            "Tree",
            ts,
            json!({
                "element": format!("{:?}", e.element),
                "parent": e.parent.map(|p| format!("{p:?}")),
                "kind": format!("{:?}", e.kind),
            }),
        ),
        RecordedEvent::Lifecycle(e) => instant(
            &format!("{:?}", e.phase),
            "Lifecycle",
            ts,
            json!({ "element": format!("{:?}", e.element) }),
        ),
        RecordedEvent::Reconcile(e) => instant(
            "Reconcile",
            "Properties",
            ts,
            json!({
                "element": format!("{:?}", e.element),
                "trigger": format!("{:?}", e.trigger),
                "entries": e.entries,
            }),
        ),
        RecordedEvent::SpanBegin(e) => span("B", &e, ts),
        RecordedEvent::SpanEnd(e) => span("E", &e, ts),
        RecordedEvent::PropertyUpdate {
            element,
            property,
            origin,
            name,
        } => instant(
            &name,
            "Rich",
            ts,
            json!({
                "element": format!("{element:?}"),
                "property": property,
                "origin": format!("{origin:?}"),
            }),
        ),
    }
}

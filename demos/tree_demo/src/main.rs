// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless UI session that exercises the tracing and diagnostics pipeline.
//!
//! Builds a small window against a [`HeadlessDom`], expands a collapsed
//! section, edits and removes items, and tears the window down. Events go to
//! both a [`PrettyPrintSink`](arbor_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](arbor_debug::recorder::RecorderSink); the recording is
//! exported as a Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use arbor_core::config::TreeConfig;
use arbor_core::dom::HeadlessDom;
use arbor_core::element::{ElementId, HostId, Leaf, Panel, Visibility};
use arbor_core::property::{PropertyMetadata, Value};
use arbor_core::trace::{
    AttachEndEvent, AttachEvent, DetachEvent, LifecycleEvent, PropertyUpdateEvent,
    ReconcileEvent, SpanEvent, TraceSink,
};
use arbor_core::tree::VisualTree;

use arbor_debug::pretty::PrettyPrintSink;
use arbor_debug::recorder::RecorderSink;

const ITEM_COUNT: usize = 3;

/// Forwards every event to both sinks.
#[derive(Debug)]
struct Tee {
    pretty: PrettyPrintSink,
    recorder: RecorderSink,
}

impl TraceSink for Tee {
    fn on_attach(&mut self, e: &AttachEvent) {
        self.pretty.on_attach(e);
        self.recorder.on_attach(e);
    }

    fn on_attach_end(&mut self, e: &AttachEndEvent) {
        self.pretty.on_attach_end(e);
        self.recorder.on_attach_end(e);
    }

    fn on_detach(&mut self, e: &DetachEvent) {
        self.pretty.on_detach(e);
        self.recorder.on_detach(e);
    }

    fn on_lifecycle(&mut self, e: &LifecycleEvent) {
        self.pretty.on_lifecycle(e);
        self.recorder.on_lifecycle(e);
    }

    fn on_reconcile(&mut self, e: &ReconcileEvent) {
        self.pretty.on_reconcile(e);
        self.recorder.on_reconcile(e);
    }

    fn on_span_begin(&mut self, e: &SpanEvent) {
        self.pretty.on_span_begin(e);
        self.recorder.on_span_begin(e);
    }

    fn on_span_end(&mut self, e: &SpanEvent) {
        self.pretty.on_span_end(e);
        self.recorder.on_span_end(e);
    }

    fn on_property_update(&mut self, e: &PropertyUpdateEvent) {
        self.pretty.on_property_update(e);
        self.recorder.on_property_update(e);
    }
}

/// Metadata whose update-DOM callback writes `css` as an inline style.
fn style_property(name: &'static str, css: &'static str, default: f64) -> PropertyMetadata {
    PropertyMetadata::new(name, default).with_update_dom(
        move |tree: &mut VisualTree, element: ElementId, value: &Value| {
            if let (Some(node), Some(v)) = (tree.dom_handle(element), value.as_f64()) {
                tree.dom_mut().set_style(node, css, &format!("{v}"));
            }
        },
    )
}

fn main() {
    // -- sinks -------------------------------------------------------------
    let sink = Tee {
        pretty: PrettyPrintSink::new(Box::new(std::io::stdout())),
        recorder: RecorderSink::new(),
    };

    // -- tree --------------------------------------------------------------
    let mut dom = HeadlessDom::new();
    let host_node = dom.create_host_node();
    let mut tree =
        VisualTree::new(TreeConfig::debug(), Box::new(dom)).with_trace_sink(Box::new(sink));
    let width = tree.register_property(style_property("Width", "width", 0.0));
    let opacity = tree.register_property(style_property("Opacity", "opacity", 1.0));

    // -- build offscreen ---------------------------------------------------
    let window = tree.create_element(Panel::new());
    let list = tree.create_element(Panel::new());
    let details = tree.create_element(Panel::new());
    let mut items = Vec::with_capacity(ITEM_COUNT);
    for i in 0..ITEM_COUNT {
        let item = tree.create_element(Leaf);
        tree.set_value(item, width, 100.0 + 10.0 * i as f64);
        Panel::add_child(&mut tree, list, item).expect("list accepts items");
        items.push(item);
    }
    let note = tree.create_element(Leaf);
    tree.set_value(note, opacity, 0.5);
    Panel::add_child(&mut tree, details, note).expect("details accepts a note");
    tree.set_visibility(details, Visibility::Collapsed);
    Panel::add_child(&mut tree, window, list).expect("window accepts the list");
    Panel::add_child(&mut tree, window, details).expect("window accepts details");

    // -- go live -----------------------------------------------------------
    println!("== attach window");
    tree.attach_root(window, HostId(0), host_node)
        .expect("window attaches");
    assert!(tree.rendering_is_deferred(note), "note waits for details");

    println!("== expand details");
    tree.set_visibility(details, Visibility::Visible);

    println!("== edit and remove");
    tree.set_value(items[0], opacity, 0.25);
    Panel::remove_child(&mut tree, list, items[1]).expect("item detaches");

    println!("== close window");
    tree.detach_root(window).expect("window detaches");

    // -- report ------------------------------------------------------------
    let ops = tree
        .dom_as::<HeadlessDom>()
        .map_or(0, |dom| dom.log().len());
    let sink = tree
        .take_trace_sink_as::<Tee>()
        .expect("the demo sink is installed");

    let path = "trace.json";
    let file = File::create(path).expect("failed to create trace.json");
    let mut writer = BufWriter::new(file);
    arbor_debug::chrome::export(sink.recorder.as_bytes(), &mut writer)
        .expect("failed to write Chrome trace");

    println!("Wrote {path} ({ops} DOM operations)");
}

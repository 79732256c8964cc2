// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::boxed::Box;
use alloc::format;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};

use crate::config::TreeConfig;
use crate::dom::{DomAdapter, DomOp, HeadlessDom};
use crate::element::{Element, ElementId, HostId, Leaf, Panel, Visibility};
use crate::error::TreeError;
use crate::property::{FireOnLoad, PropertyId, PropertyMetadata, Resolution, Value, ValueSource};

use super::VisualTree;

type Log = Rc<RefCell<Vec<String>>>;
type Hook = Box<dyn Fn(&mut VisualTree, ElementId) -> Result<(), TreeError>>;

/// An element that records its lifecycle notifications.
struct Probe {
    name: &'static str,
    log: Log,
    framework: bool,
    children: RefCell<Vec<ElementId>>,
    attached_hook: Option<Hook>,
    detached_hook: Option<Hook>,
}

impl Probe {
    fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            framework: true,
            children: RefCell::new(Vec::new()),
            attached_hook: None,
            detached_hook: None,
        }
    }

    fn visual(name: &'static str, log: &Log) -> Self {
        Self {
            framework: false,
            ..Self::new(name, log)
        }
    }

    fn with_children(self, children: &[ElementId]) -> Self {
        *self.children.borrow_mut() = children.to_vec();
        self
    }

    fn on_attached(
        mut self,
        hook: impl Fn(&mut VisualTree, ElementId) -> Result<(), TreeError> + 'static,
    ) -> Self {
        self.attached_hook = Some(Box::new(hook));
        self
    }

    fn on_detached(
        mut self,
        hook: impl Fn(&mut VisualTree, ElementId) -> Result<(), TreeError> + 'static,
    ) -> Self {
        self.detached_hook = Some(Box::new(hook));
        self
    }

    fn record(&self, event: &str) {
        self.log.borrow_mut().push(format!("{}:{event}", self.name));
    }
}

impl Element for Probe {
    fn type_name(&self) -> &'static str {
        self.name
    }

    fn is_framework_element(&self) -> bool {
        self.framework
    }

    fn load_resources(&self, _: &mut VisualTree, _: ElementId) -> Result<(), TreeError> {
        self.record("load_resources");
        Ok(())
    }

    fn on_attached(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        self.record("attached");
        let children = self.children.borrow().clone();
        for child in children {
            tree.attach_visual_child(child, id, None)?;
        }
        if let Some(hook) = &self.attached_hook {
            hook(tree, id)?;
        }
        Ok(())
    }

    fn on_loaded(&self, _: &mut VisualTree, _: ElementId) -> Result<(), TreeError> {
        self.record("loaded");
        Ok(())
    }

    fn on_detached(&self, tree: &mut VisualTree, id: ElementId) -> Result<(), TreeError> {
        self.record("detached");
        if let Some(hook) = &self.detached_hook {
            hook(tree, id)?;
        }
        Ok(())
    }

    fn on_unloaded(&self, _: &mut VisualTree, _: ElementId) -> Result<(), TreeError> {
        self.record("unloaded");
        Ok(())
    }

    fn unload_resources(&self, _: &mut VisualTree, _: ElementId) -> Result<(), TreeError> {
        self.record("unload_resources");
        Ok(())
    }

    fn visual_child_count(&self) -> usize {
        self.children.borrow().len()
    }

    fn visual_child(&self, index: usize) -> Option<ElementId> {
        self.children.borrow().get(index).copied()
    }
}

/// A distinct element type for type-directed lookups.
struct Marker;

impl Element for Marker {}

struct Fixture {
    tree: VisualTree,
    root: ElementId,
    log: Log,
}

impl Fixture {
    fn new() -> Self {
        Self::with_config(TreeConfig::new())
    }

    fn with_config(config: TreeConfig) -> Self {
        let mut dom = HeadlessDom::new();
        let host_node = dom.create_host_node();
        let mut tree = VisualTree::new(config, Box::new(dom));
        let log = Log::default();
        let root = tree.create_element(Probe::new("root", &log));
        tree.attach_root(root, HostId(1), host_node).unwrap();
        log.borrow_mut().clear();
        Self { tree, root, log }
    }

    fn probe(&mut self, name: &'static str) -> ElementId {
        self.tree.create_element(Probe::new(name, &self.log))
    }

    fn attach(&mut self, child: ElementId) {
        let root = self.root;
        self.tree.attach_visual_child(child, root, None).unwrap();
    }

    fn take_log(&self) -> Vec<String> {
        core::mem::take(&mut *self.log.borrow_mut())
    }

    fn dom(&self) -> &HeadlessDom {
        self.tree.dom_as::<HeadlessDom>().unwrap()
    }

    fn node(&self, element: ElementId) -> crate::dom::DomHandle {
        self.tree.dom_handle(element).unwrap()
    }
}

fn push(log: &Log, entry: String) {
    log.borrow_mut().push(entry);
}

/// Metadata whose callbacks log `<type>.<name>:<callback>=<values>`.
fn logged_metadata(log: &Log, name: &'static str, default: impl Into<Value>) -> PropertyMetadata {
    let (l1, l2, l3) = (Rc::clone(log), Rc::clone(log), Rc::clone(log));
    PropertyMetadata::new(name, default)
        .with_update_dom(move |tree, id, value| {
            push(&l1, format!("{}.{name}:update_dom={value:?}", tree.type_name(id)));
        })
        .with_update_dom_transition(move |tree, id, old, new| {
            push(
                &l2,
                format!("{}.{name}:transition={old:?}->{new:?}", tree.type_name(id)),
            );
        })
        .with_changed(move |tree, id, change| {
            push(
                &l3,
                format!(
                    "{}.{name}:changed={:?}->{:?}",
                    tree.type_name(id),
                    change.old_value,
                    change.new_value
                ),
            );
        })
}

fn logged_property(f: &mut Fixture, name: &'static str) -> PropertyId {
    let metadata = logged_metadata(&f.log, name, 0_i64);
    f.tree.register_property(metadata)
}

// -- Attach --

#[test]
fn attach_runs_hooks_around_reconciliation() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_value(child, width, 5_i64);
    assert_eq!(
        f.take_log(),
        ["child.Width:changed=Int(0)->Int(5)"],
        "offscreen changes only notify"
    );

    f.attach(child);

    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            "child.Width:update_dom=Int(5)",
            "child.Width:transition=Unset->Int(5)",
            "child.Width:changed=Int(5)->Int(5)",
            "child:loaded",
        ]
    );
    assert!(f.tree.is_element_in_visual_tree(child), "child is live");
    assert!(f.tree.is_loaded(child), "child is loaded");
    assert_eq!(f.tree.visual_parent(child), Some(f.root));
    assert_eq!(f.tree.visual_children(f.root), Some(&[child][..]));
    assert_eq!(f.tree.host(child), Some(HostId(1)), "host is inherited");
}

#[test]
fn attach_wires_the_dom_node() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);

    let node = f.node(child);
    let root_node = f.node(f.root);
    let dom = f.dom();
    assert_eq!(dom.parent_of(node), Some(root_node));
    assert_eq!(dom.registered_element(node), Some(child));
    assert!(dom.has_listeners(node), "listeners wired");
    assert!(dom.pointer_events(node), "hit-testable after reconciliation");
    assert!(!dom.has_class(node, "child"), "type classes are opt-in");
}

#[test]
fn attach_is_idempotent() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);
    let node = f.node(child);
    f.take_log();
    let ops = f.dom().log().len();

    f.attach(child);

    assert!(f.take_log().is_empty(), "no hook ran again");
    assert_eq!(f.dom().log().len(), ops, "no DOM call was made");
    assert_eq!(f.node(child), node);
    assert_eq!(f.tree.visual_children(f.root), Some(&[child][..]));
}

#[test]
fn attach_null_child_is_a_no_op() {
    let mut f = Fixture::new();
    let root = f.root;
    f.tree
        .attach_visual_child(None::<ElementId>, root, None)
        .unwrap();
    f.tree.detach_visual_child(None::<ElementId>, root).unwrap();
    assert_eq!(f.tree.visual_children(root), None);
}

#[test]
fn attach_under_offscreen_parent_is_a_no_op() {
    let mut f = Fixture::new();
    let parent = f.probe("parent");
    let child = f.probe("child");

    f.tree.attach_visual_child(child, parent, None).unwrap();

    assert!(!f.tree.is_connected(child), "child stays offscreen");
    assert_eq!(f.tree.visual_parent(child), None);
    assert_eq!(f.tree.visual_children(parent), None, "nothing was recorded");
    assert!(f.take_log().is_empty(), "no hook ran");
}

#[test]
fn attach_rejects_a_second_parent() {
    let mut f = Fixture::new();
    let first = f.probe("first");
    let second = f.probe("second");
    let child = f.probe("child");
    f.attach(first);
    f.attach(second);
    f.tree.attach_visual_child(child, first, None).unwrap();
    f.take_log();

    let err = f.tree.attach_visual_child(child, second, None).unwrap_err();

    assert_eq!(
        err,
        TreeError::AlreadyHasParent {
            child: "child",
            current_parent: "first",
            requested_parent: "second",
        }
    );
    assert_eq!(f.tree.visual_parent(child), Some(first), "nothing moved");
    assert_eq!(f.tree.visual_children(second), None);
    assert!(f.take_log().is_empty(), "no hook ran");
}

#[test]
fn attach_inserts_dom_nodes_at_the_requested_index() {
    let mut f = Fixture::new();
    let root = f.root;
    let a = f.probe("a");
    let b = f.probe("b");
    f.attach(a);
    f.tree.attach_visual_child(b, root, Some(0)).unwrap();

    let expected = vec![f.node(b), f.node(a)];
    assert_eq!(f.dom().children_of(f.node(root)), expected);
    assert_eq!(
        f.tree.visual_children(root),
        Some(&[a, b][..]),
        "bookkeeping keeps attach order"
    );
}

#[test]
fn children_are_loaded_before_their_parent() {
    let mut f = Fixture::new();
    let a = f.probe("a");
    let b = f.probe("b");
    let panel = f
        .tree
        .create_element(Probe::new("panel", &f.log).with_children(&[a, b]));

    f.attach(panel);

    assert_eq!(
        f.take_log(),
        [
            "panel:load_resources",
            "panel:attached",
            "a:load_resources",
            "a:attached",
            "a:loaded",
            "b:load_resources",
            "b:attached",
            "b:loaded",
            "panel:loaded",
        ]
    );
    let panel_node = f.node(panel);
    assert_eq!(f.dom().parent_of(f.node(a)), Some(panel_node));
}

#[test]
fn bare_visuals_skip_framework_notifications() {
    let mut f = Fixture::new();
    let visual = f.tree.create_element(Probe::visual("visual", &f.log));
    f.attach(visual);
    assert_eq!(f.take_log(), ["visual:attached"]);

    let root = f.root;
    f.tree.detach_visual_child(visual, root).unwrap();
    assert_eq!(f.take_log(), ["visual:detached"]);
}

#[test]
fn type_class_is_added_when_configured() {
    let mut f = Fixture::with_config(TreeConfig::debug());
    let child = f.probe("child");
    f.attach(child);
    assert!(f.dom().has_class(f.node(child), "child"), "class names the type");
}

#[test]
fn dom_failures_propagate() {
    let mut f = Fixture::new();
    let parent = f.probe("parent");
    let child = f.probe("child");
    f.attach(parent);
    let parent_node = f.node(parent);
    f.tree
        .dom_as_mut::<HeadlessDom>()
        .unwrap()
        .remove_dom_node(parent_node);

    let err = f.tree.attach_visual_child(child, parent, None).unwrap_err();
    assert!(matches!(err, TreeError::Dom(_)), "got {err:?}");
}

#[test]
fn superseded_attach_delivers_loaded_once() {
    let mut f = Fixture::new();
    let root = f.root;
    let done = Cell::new(false);
    let child = f.tree.create_element(Probe::new("child", &f.log).on_attached(
        move |tree, id| {
            if !done.replace(true) {
                tree.detach_visual_child(id, root)?;
                tree.attach_visual_child(id, root, None)?;
            }
            Ok(())
        },
    ));

    f.attach(child);

    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            "child:detached",
            "child:unloaded",
            "child:unload_resources",
            "child:load_resources",
            "child:attached",
            "child:loaded",
        ]
    );
    assert!(f.tree.is_element_in_visual_tree(child), "re-attached");
    assert!(f.tree.is_loaded(child), "loaded by the nested attach");
    assert_eq!(f.tree.visual_children(root), Some(&[child][..]));
}

// -- Reconciliation --

#[test]
fn reconciliation_reads_values_at_visit_time() {
    let mut f = Fixture::new();
    let b = logged_property(&mut f, "B");
    let c = logged_property(&mut f, "C");
    let fired = Cell::new(false);
    let a = f.tree.register_property(PropertyMetadata::new("A", 0_i64).with_update_dom(
        move |tree, id, _| {
            if !fired.replace(true) {
                tree.set_value(id, b, 20_i64);
                tree.set_value(id, c, 30_i64);
            }
        },
    ));
    let child = f.probe("child");
    f.tree.set_value(child, a, 1_i64);
    f.tree.set_value(child, b, 2_i64);
    f.take_log();

    f.attach(child);

    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            // A's callback changes B and C while the element is live. B is
            // still to be visited, so only its change notification fires.
            "child.B:changed=Int(2)->Int(20)",
            "child.C:update_dom=Int(30)",
            "child.C:transition=Int(0)->Int(30)",
            "child.C:changed=Int(0)->Int(30)",
            // B is visited afterwards and sees the new value, once; C was
            // not in the snapshot.
            "child.B:update_dom=Int(20)",
            "child.B:transition=Unset->Int(20)",
            "child.B:changed=Int(20)->Int(20)",
            "child:loaded",
        ]
    );
}

#[test]
fn reconciliation_does_not_replay_visited_properties() {
    let mut f = Fixture::new();
    let a = logged_property(&mut f, "A");
    let fired = Cell::new(false);
    let b = f.tree.register_property(PropertyMetadata::new("B", 0_i64).with_update_dom(
        move |tree, id, _| {
            if !fired.replace(true) {
                tree.set_value(id, a, 99_i64);
            }
        },
    ));
    let child = f.probe("child");
    f.tree.set_value(child, a, 1_i64);
    f.tree.set_value(child, b, 2_i64);
    f.take_log();

    f.attach(child);

    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            "child.A:update_dom=Int(1)",
            "child.A:transition=Unset->Int(1)",
            "child.A:changed=Int(1)->Int(1)",
            // B's callback rewrites A after A was visited.
            "child.A:changed=Int(1)->Int(99)",
            "child:loaded",
        ]
    );
    assert_eq!(
        f.tree.get_value(child, a, Resolution::FullyResolved),
        Value::Int(99)
    );

    // Outside a pass the change reaches the DOM callbacks again.
    f.tree.set_value(child, a, 7_i64);
    assert_eq!(
        f.take_log(),
        [
            "child.A:update_dom=Int(7)",
            "child.A:transition=Int(99)->Int(7)",
            "child.A:changed=Int(99)->Int(7)",
        ]
    );
}

#[test]
fn explicit_reconciliation_needs_a_dom_node() {
    let mut f = Fixture::new();
    let a = logged_property(&mut f, "A");
    let child = f.probe("child");
    f.tree.set_value(child, a, 5_i64);
    f.take_log();

    f.tree.reconcile_properties(child);
    assert!(f.take_log().is_empty(), "offscreen element is left alone");

    f.attach(child);
    f.take_log();
    f.tree.reconcile_properties(child);
    assert_eq!(
        f.take_log(),
        [
            "child.A:update_dom=Int(5)",
            "child.A:transition=Unset->Int(5)",
            "child.A:changed=Int(5)->Int(5)",
        ]
    );
}

#[test]
fn reconciliation_skips_default_sourced_entries() {
    let mut f = Fixture::new();
    let a = logged_property(&mut f, "A");
    let b = logged_property(&mut f, "B");
    let child = f.probe("child");
    f.tree.set_value(child, a, 3_i64);
    f.tree.clear_value(child, a);
    f.tree.set_value(child, b, 4_i64);
    f.take_log();

    f.attach(child);

    let log = f.take_log();
    assert!(
        !log.iter().any(|entry| entry.starts_with("child.A")),
        "cleared entry was replayed: {log:?}"
    );
    assert!(log.contains(&String::from("child.B:update_dom=Int(4)")), "{log:?}");
    assert_eq!(f.tree.effective_entries(child).len(), 2, "cleared entry kept");
    assert_eq!(f.tree.value_source(child, a), ValueSource::Default);
}

#[test]
fn changed_respects_fire_on_load_and_defaults() {
    let mut f = Fixture::new();
    let quiet = f.tree.register_property(
        logged_metadata(&f.log, "Quiet", 0_i64).with_fire_on_load(FireOnLoad::Never),
    );
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_value(child, quiet, 1_i64);
    // Equal to the default: stored, but not announced.
    f.tree.set_value(child, width, 0_i64);
    f.take_log();

    f.attach(child);

    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            "child.Quiet:update_dom=Int(1)",
            "child.Quiet:transition=Unset->Int(1)",
            "child.Width:update_dom=Int(0)",
            "child.Width:transition=Unset->Int(0)",
            "child:loaded",
        ]
    );
}

#[test]
fn per_type_metadata_overrides_apply() {
    let mut f = Fixture::new();
    let opacity = f
        .tree
        .register_property(logged_metadata(&f.log, "Opacity", 1.0));
    f.tree
        .override_metadata::<Panel>(opacity, logged_metadata(&f.log, "PanelOpacity", 0.5));
    let panel = f.tree.create_element(Panel::new());
    let child = f.probe("child");
    f.tree.set_value(panel, opacity, 0.25);
    f.tree.set_value(child, opacity, 0.25);
    f.take_log();

    f.attach(panel);
    f.attach(child);

    let log = f.take_log();
    assert!(
        log.contains(&String::from("Panel.PanelOpacity:update_dom=Float(0.25)")),
        "{log:?}"
    );
    assert!(
        log.contains(&String::from("child.Opacity:update_dom=Float(0.25)")),
        "{log:?}"
    );
    assert_eq!(
        f.tree.metadata_for(panel, opacity).default_value,
        Value::Float(0.5)
    );
    f.tree.clear_value(panel, opacity);
    assert_eq!(
        f.tree.get_value(panel, opacity, Resolution::Base),
        Value::Float(0.5),
        "clearing reverts to the overridden default"
    );
}

#[test]
fn coerced_values_are_what_the_dom_sees() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_value(child, width, 500_i64);
    f.tree.coerce_value(child, width, Some(Value::Int(100)));
    f.take_log();

    f.attach(child);

    assert!(
        f.take_log()
            .contains(&String::from("child.Width:update_dom=Int(100)")),
        "coerced value replayed"
    );
    assert_eq!(
        f.tree.get_value(child, width, Resolution::Base),
        Value::Int(500)
    );
}

#[test]
fn lower_precedence_values_do_not_override() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_value(child, width, 5_i64);
    f.tree
        .set_value_with_source(child, width, 9_i64, ValueSource::Style);
    assert_eq!(
        f.tree.get_value(child, width, Resolution::FullyResolved),
        Value::Int(5)
    );
    assert_eq!(f.tree.value_source(child, width), ValueSource::Local);
}

#[test]
fn live_changes_update_the_dom() {
    let mut f = Fixture::new();
    let width = f.tree.register_property(
        PropertyMetadata::new("Width", 0_i64).with_update_dom(|tree, id, value| {
            if let (Some(node), Some(px)) = (tree.dom_handle(id), value.as_f64()) {
                tree.dom_mut().set_style(node, "width", &format!("{px}px"));
            }
        }),
    );
    let child = f.probe("child");
    f.attach(child);

    f.tree.set_value(child, width, 40_i64);

    assert_eq!(f.dom().style(f.node(child), "width"), Some("40px"));
}

// -- Deferred rendering --

#[test]
fn collapsed_elements_defer_until_visible() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_visibility(child, Visibility::Collapsed);
    f.tree.set_value(child, width, 7_i64);
    f.take_log();

    f.attach(child);

    assert_eq!(
        f.take_log(),
        ["child:load_resources", "child:attached", "child:loaded"],
        "no property reached the DOM"
    );
    let node = f.node(child);
    assert!(f.tree.rendering_is_deferred(child), "deferred");
    assert!(!f.dom().is_visible(node), "collapsed node is hidden");
    assert!(!f.dom().pointer_events(node), "not hit-testable yet");

    f.tree.set_visibility(child, Visibility::Visible);

    assert_eq!(
        f.take_log(),
        [
            "child.Width:update_dom=Int(7)",
            "child.Width:transition=Unset->Int(7)",
            "child.Width:changed=Int(7)->Int(7)",
        ]
    );
    assert!(!f.tree.rendering_is_deferred(child), "resolved");
    assert!(f.dom().is_visible(node), "shown");
    assert!(f.dom().pointer_events(node), "hit-testable");
}

#[test]
fn deferred_descendants_resolve_parent_first() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let inner = f.probe("inner");
    let outer = f
        .tree
        .create_element(Probe::new("outer", &f.log).with_children(&[inner]));
    f.tree.set_visibility(outer, Visibility::Collapsed);
    f.tree.set_value(outer, width, 1_i64);
    f.tree.set_value(inner, width, 2_i64);
    f.take_log();

    f.attach(outer);

    assert!(f.tree.rendering_is_deferred(outer), "outer deferred");
    assert!(f.tree.rendering_is_deferred(inner), "inner deferred via ancestor");
    let inner_node = f.node(inner);
    assert!(
        !f.dom()
            .log()
            .contains(&DomOp::SetVisible(inner_node, false)),
        "only the collapsed element itself is hidden"
    );
    f.take_log();

    f.tree.set_visibility(outer, Visibility::Visible);

    let updates: Vec<String> = f
        .take_log()
        .into_iter()
        .filter(|entry| entry.contains("update_dom"))
        .collect();
    assert_eq!(
        updates,
        ["outer.Width:update_dom=Int(1)", "inner.Width:update_dom=Int(2)"]
    );
    assert!(!f.tree.rendering_is_deferred(inner), "inner resolved");
}

#[test]
fn collapsed_child_stays_deferred_when_ancestor_shows() {
    let mut f = Fixture::new();
    let inner = f.probe("inner");
    let outer = f
        .tree
        .create_element(Probe::new("outer", &f.log).with_children(&[inner]));
    f.tree.set_visibility(outer, Visibility::Collapsed);
    f.tree.set_visibility(inner, Visibility::Collapsed);
    f.attach(outer);

    f.tree.set_visibility(outer, Visibility::Visible);

    assert!(!f.tree.rendering_is_deferred(outer), "outer resolved");
    assert!(f.tree.rendering_is_deferred(inner), "inner is still collapsed");
    assert!(!f.tree.is_visible(inner), "inner not effectively visible");
}

#[test]
fn deferral_can_be_switched_off() {
    let mut f = Fixture::with_config(TreeConfig::new().with_deferred_rendering(false));
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_visibility(child, Visibility::Collapsed);
    f.tree.set_value(child, width, 7_i64);
    f.take_log();

    f.attach(child);

    assert!(!f.tree.rendering_is_deferred(child), "not deferred");
    assert!(
        f.take_log()
            .contains(&String::from("child.Width:update_dom=Int(7)")),
        "reconciled immediately"
    );
    assert!(!f.dom().is_visible(f.node(child)), "still hidden");
    assert!(!f.dom().pointer_events(f.node(child)), "not hit-testable");
}

#[test]
fn hit_test_visibility_reaches_the_dom() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.tree.set_hit_test_visible(child, false);
    f.attach(child);
    let node = f.node(child);
    assert!(!f.dom().pointer_events(node), "opted out of hit testing");

    f.tree.set_hit_test_visible(child, true);
    assert!(f.dom().pointer_events(node), "opted back in");
    assert!(f.tree.is_hit_testable(child), "reports hit-testable");
}

// -- Detach --

#[test]
fn detach_flags_the_subtree_before_tearing_down() {
    let mut f = Fixture::new();
    let watched: Rc<RefCell<Vec<ElementId>>> = Rc::default();
    let seen: Rc<RefCell<Vec<bool>>> = Rc::default();
    let a1 = f.probe("a1");
    let a = f
        .tree
        .create_element(Probe::new("a", &f.log).with_children(&[a1]));
    let b = f.probe("b");
    let (w, s) = (Rc::clone(&watched), Rc::clone(&seen));
    let panel = f.tree.create_element(
        Probe::new("panel", &f.log)
            .with_children(&[a, b])
            .on_detached(move |tree, _| {
                let flags = w.borrow().iter().map(|&e| tree.is_unloading(e)).collect::<Vec<_>>();
                s.borrow_mut().extend(flags);
                Ok(())
            }),
    );
    f.attach(panel);
    *watched.borrow_mut() = vec![a, a1, b];
    f.take_log();

    let root = f.root;
    f.tree.detach_visual_child(panel, root).unwrap();

    assert_eq!(*seen.borrow(), [true, true, true], "descendants flagged first");
    let detached: Vec<String> = f
        .take_log()
        .into_iter()
        .filter(|entry| entry.ends_with(":detached"))
        .collect();
    assert_eq!(
        detached,
        ["panel:detached", "a:detached", "a1:detached", "b:detached"],
        "parent before children, depth first"
    );
    for element in [panel, a, a1, b] {
        assert!(!f.tree.is_connected(element), "{element:?} disconnected");
        assert!(!f.tree.is_unloading(element), "{element:?} flag reset");
        assert!(!f.tree.is_loaded(element), "{element:?} unloaded");
        assert_eq!(f.tree.dom_handle(element), None);
        assert_eq!(f.tree.visual_parent(element), None);
    }
    assert_eq!(f.tree.visual_children(root), Some(&[][..]));
}

#[test]
fn detach_runs_teardown_in_order_and_cleans_the_dom() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);
    let node = f.node(child);
    let registered = f.dom().registered_count();
    f.take_log();

    let root = f.root;
    f.tree.detach_visual_child(child, root).unwrap();

    assert_eq!(
        f.take_log(),
        ["child:detached", "child:unloaded", "child:unload_resources"]
    );
    let dom = f.dom();
    assert!(!dom.is_alive(node), "node removed");
    assert_eq!(dom.registered_count(), registered - 1, "node unregistered");
    assert!(dom.log().contains(&DomOp::DetachListeners(node, child)), "listeners removed");
}

#[test]
fn detach_then_reattach_replays_values() {
    let mut f = Fixture::new();
    let width = logged_property(&mut f, "Width");
    let child = f.probe("child");
    f.tree.set_value(child, width, 5_i64);
    f.attach(child);
    let first_node = f.node(child);
    let root = f.root;
    f.tree.detach_visual_child(child, root).unwrap();
    assert_eq!(
        f.tree.get_value(child, width, Resolution::FullyResolved),
        Value::Int(5),
        "values survive detach"
    );
    f.take_log();

    f.attach(child);

    assert_ne!(f.node(child), first_node, "fresh DOM node");
    assert_eq!(
        f.take_log(),
        [
            "child:load_resources",
            "child:attached",
            "child.Width:update_dom=Int(5)",
            "child.Width:transition=Unset->Int(5)",
            "child.Width:changed=Int(5)->Int(5)",
            "child:loaded",
        ]
    );
}

#[test]
fn detach_of_a_stranger_is_an_error() {
    let mut f = Fixture::new();
    let a = f.probe("a");
    let b = f.probe("b");
    f.attach(a);
    f.attach(b);

    let err = f.tree.detach_visual_child(a, b).unwrap_err();

    assert_eq!(err, TreeError::NotAChild { child: "a", parent: "b" });
    assert!(f.tree.is_element_in_visual_tree(a), "a untouched");
}

#[test]
fn detach_of_an_offscreen_stranger_is_a_no_op() {
    let mut f = Fixture::new();
    let a = f.probe("a");
    let root = f.root;
    f.tree.detach_visual_child(a, root).unwrap();
    assert!(f.take_log().is_empty(), "nothing happened");
}

#[test]
fn logical_detach_during_teardown_releases_the_child_subtree() {
    let mut f = Fixture::new();
    let grandchild = f.probe("grandchild");
    let child = f.tree.create_element(Probe::new("child", &f.log).with_children(&[grandchild]));
    let panel = f.tree.create_element(
        Probe::new("panel", &f.log)
            .with_children(&[child])
            .on_detached(move |tree, id| tree.detach_visual_child(child, id)),
    );
    f.attach(panel);
    let grandchild_node = f.node(grandchild);
    f.take_log();

    let root = f.root;
    f.tree.detach_visual_child(panel, root).unwrap();

    assert_eq!(
        f.take_log(),
        [
            "panel:detached",
            "child:detached",
            "child:unloaded",
            "child:unload_resources",
            "grandchild:detached",
            "grandchild:unloaded",
            "grandchild:unload_resources",
            "panel:unloaded",
            "panel:unload_resources",
        ]
    );
    assert!(!f.tree.is_connected(child), "child torn down");
    assert_eq!(f.tree.visual_parent(child), None);

    assert!(!f.tree.is_connected(grandchild), "grandchild torn down");
    assert!(!f.tree.is_unloading(grandchild));
    assert_eq!(f.tree.visual_parent(grandchild), None);
    assert_eq!(f.tree.dom_handle(grandchild), None);
    assert_eq!(f.dom().registered_element(grandchild_node), None);

    f.attach(grandchild);
    assert!(f.tree.is_element_in_visual_tree(grandchild), "re-attachable");
    f.tree.detach_visual_child(grandchild, root).unwrap();
    f.tree.destroy_element(grandchild).unwrap();
}

#[test]
fn teardown_releases_focus_and_capture() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    let offscreen = f.probe("offscreen");
    assert!(!f.tree.focus(offscreen), "offscreen elements cannot focus");
    f.attach(child);
    assert!(f.tree.focus(child), "live element takes focus");
    assert!(f.tree.capture_pointer(child), "live element takes capture");

    let root = f.root;
    f.tree.detach_visual_child(child, root).unwrap();

    assert_eq!(f.tree.input().focused(), None);
    assert_eq!(f.tree.input().captured(), None);
}

#[test]
fn detach_root_keeps_the_host_node() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);
    let root = f.root;
    let host_node = f.node(root);
    let child_node = f.node(child);
    f.take_log();

    f.tree.detach_root(root).unwrap();

    assert_eq!(
        f.take_log(),
        [
            "root:detached",
            "root:unloaded",
            "root:unload_resources",
            "child:detached",
            "child:unloaded",
            "child:unload_resources",
        ]
    );
    assert!(f.dom().is_alive(host_node), "host node stays");
    assert!(!f.dom().is_alive(child_node), "tree-created node removed");
    assert_eq!(f.tree.host(child), None);
    assert_eq!(f.dom().registered_count(), 0);
}

#[test]
fn detach_root_rejects_children() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);
    assert_eq!(
        f.tree.detach_root(child),
        Err(TreeError::NotAChild {
            child: "child",
            parent: "host root",
        })
    );
}

// -- Queries --

#[test]
fn get_child_of_type_is_depth_first_pre_order() {
    let mut f = Fixture::new();
    let deep = f.tree.create_element(Marker);
    let shallow = f.tree.create_element(Marker);
    let inner = f.tree.create_element(Panel::new());
    let outer = f.tree.create_element(Panel::new());
    Panel::add_child(&mut f.tree, inner, deep).unwrap();
    Panel::add_child(&mut f.tree, outer, inner).unwrap();
    Panel::add_child(&mut f.tree, outer, shallow).unwrap();

    assert_eq!(f.tree.get_child_of_type::<Marker>(outer), Some(deep));
    assert_eq!(
        f.tree.get_child_of_type::<Panel>(outer),
        Some(inner),
        "the root itself is not a candidate"
    );
    assert_eq!(f.tree.get_child_of_type::<Leaf>(outer), None);
    assert_eq!(f.tree.get_child_of_type::<Marker>(None::<ElementId>), None);
}

#[test]
fn ancestors_walk_to_the_root() {
    let mut f = Fixture::new();
    let inner = f.probe("inner");
    let outer = f
        .tree
        .create_element(Probe::new("outer", &f.log).with_children(&[inner]));
    f.attach(outer);

    let chain: Vec<_> = f.tree.ancestors(inner).collect();
    assert_eq!(chain, [outer, f.root]);
}

// -- Panel --

#[test]
fn panel_attaches_children_added_while_live() {
    let mut f = Fixture::new();
    let panel = f.tree.create_element(Panel::new());
    let a = f.probe("a");
    let b = f.probe("b");
    f.attach(panel);

    Panel::add_child(&mut f.tree, panel, a).unwrap();
    Panel::insert_child(&mut f.tree, panel, 0, b).unwrap();

    assert_eq!(f.tree.behavior_as::<Panel>(panel).unwrap().children(), [b, a]);
    let expected = vec![f.node(b), f.node(a)];
    assert_eq!(f.dom().children_of(f.node(panel)), expected);

    assert!(Panel::remove_child(&mut f.tree, panel, a).unwrap(), "a was listed");
    assert!(!f.tree.is_connected(a), "a detached");
    assert!(!Panel::remove_child(&mut f.tree, panel, a).unwrap(), "already gone");
}

#[test]
fn panel_operations_reject_other_elements() {
    let mut f = Fixture::new();
    let leaf = f.tree.create_element(Leaf);
    let child = f.probe("child");
    assert_eq!(
        Panel::add_child(&mut f.tree, leaf, child),
        Err(TreeError::UnexpectedElementType {
            expected: "Panel",
            found: "Leaf",
        })
    );
}

#[test]
fn panel_takes_back_a_child_that_fails_to_attach() {
    let mut f = Fixture::new();
    let first = f.tree.create_element(Panel::new());
    let second = f.tree.create_element(Panel::new());
    let child = f.probe("child");
    f.attach(first);
    f.attach(second);
    Panel::add_child(&mut f.tree, first, child).unwrap();

    assert!(Panel::add_child(&mut f.tree, second, child).is_err(), "conflict");
    assert!(
        f.tree.behavior_as::<Panel>(second).unwrap().children().is_empty(),
        "list rolled back"
    );
}

// -- Allocation --

#[test]
fn destroy_requires_detach() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.attach(child);
    assert_eq!(
        f.tree.destroy_element(child),
        Err(TreeError::StillAttached { element: "child" })
    );

    let root = f.root;
    f.tree.detach_visual_child(child, root).unwrap();
    f.tree.destroy_element(child).unwrap();
    assert!(!f.tree.is_alive(child), "handle is stale");

    let reused = f.probe("reused");
    assert_eq!(reused.index(), child.index(), "slot reused");
    assert_ne!(reused, child, "generation bumped");
}

#[test]
#[should_panic(expected = "stale ElementId")]
fn destroyed_handle_panics() {
    let mut f = Fixture::new();
    let child = f.probe("child");
    f.tree.destroy_element(child).unwrap();
    let _ = f.tree.is_connected(child);
}

// -- Tracing --

#[cfg(feature = "trace")]
mod tracing {
    use super::*;
    use crate::trace::{
        AttachEndEvent, AttachOutcome, DetachEvent, DetachKind, SpanEvent, TraceSink,
    };

    #[derive(Default)]
    struct Events(Vec<String>);

    impl TraceSink for Events {
        fn on_attach_end(&mut self, e: &AttachEndEvent) {
            self.0.push(format!("end {:?}", e.outcome));
        }

        fn on_detach(&mut self, e: &DetachEvent) {
            self.0.push(format!("detach {:?}", e.kind));
        }

        fn on_span_begin(&mut self, e: &SpanEvent) {
            self.0.push(format!("begin {:?}", e.kind));
        }

        fn on_span_end(&mut self, e: &SpanEvent) {
            self.0.push(format!("finish {:?}", e.kind));
        }
    }

    #[test]
    fn performance_logging_brackets_operations() {
        let mut f = Fixture::with_config(TreeConfig::debug());
        f.tree.set_trace_sink(Box::new(Events::default()));
        let child = f.probe("child");

        f.attach(child);

        let events = f.tree.take_trace_sink_as::<Events>().unwrap().0;
        assert_eq!(
            events,
            [
                "begin Attach",
                "begin Reconcile",
                "finish Reconcile",
                "end Completed",
                "finish Attach",
            ]
        );
    }

    #[test]
    fn spans_are_off_by_default() {
        let mut f = Fixture::new();
        f.tree.set_trace_sink(Box::new(Events::default()));
        let child = f.probe("child");
        f.tree.set_visibility(child, Visibility::Collapsed);

        f.attach(child);

        let events = &f.tree.trace_sink_as::<Events>().unwrap().0;
        assert_eq!(events, &[format!("end {:?}", AttachOutcome::Deferred)]);
    }

    #[test]
    fn logical_detach_is_reported() {
        let mut f = Fixture::new();
        let child = f.probe("child");
        let panel = f.tree.create_element(
            Probe::new("panel", &f.log)
                .with_children(&[child])
                .on_detached(move |tree, id| tree.detach_visual_child(child, id)),
        );
        f.attach(panel);
        f.tree.set_trace_sink(Box::new(Events::default()));

        let root = f.root;
        f.tree.detach_visual_child(panel, root).unwrap();

        let events = &f.tree.trace_sink_as::<Events>().unwrap().0;
        assert_eq!(
            events,
            &[
                format!("detach {:?}", DetachKind::Full),
                format!("detach {:?}", DetachKind::LogicalOnly),
            ]
        );
    }
}

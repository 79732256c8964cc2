// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Retained visual tree with DOM projection and lifecycle ordering.
//!
//! `arbor_core` owns the engine that keeps a retained tree of UI elements in
//! sync with a DOM-like presentation tree. It is `no_std` compatible (with
//! `alloc`) and stores elements in an arena addressed by generational handles.
//!
//! # Architecture
//!
//! Tree mutations flow through a single [`VisualTree`](tree::VisualTree):
//!
//! ```text
//!   container "add child" logic
//!       │
//!       ▼
//!   VisualTree::attach_visual_child ──► DomAdapter::create_dom_node
//!       │                                     │
//!       ▼                                     ▼
//!   Element::on_attached ──► (nested attaches for the element's children)
//!       │
//!       ▼
//!   reconcile_properties ──► update-DOM / changed callbacks
//!       │
//!       ▼
//!   Element::on_loaded
//! ```
//!
//! Detaching is the mirror image: the whole subtree is marked as unloading
//! first, then each node is torn down parent-first.
//!
//! **[`tree`]**: The element arena and the attach, detach, and
//! reconciliation algorithms.
//!
//! **[`element`]**: Element handles, the [`Element`](element::Element)
//! lifecycle trait, and the generic [`Panel`](element::Panel) container.
//!
//! **[`property`]**: Property registry, metadata callbacks, and
//! per-element effective values.
//!
//! **[`dom`]**: The [`DomAdapter`](dom::DomAdapter) contract that platform
//! backends implement, plus an in-memory [`HeadlessDom`](dom::HeadlessDom).
//!
//! **[`dirty`]**: Dirty channels used to resolve deferred rendering when
//! visibility changes.
//!
//! **[`input`]**: Focus and pointer-capture bookkeeping.
//!
//! **[`config`]**: Per-tree behaviour switches.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! lifecycle instrumentation, with a zero-overhead [`Tracer`](trace::Tracer).
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-property
//!   update events emitted during reconciliation.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod config;
pub mod dirty;
pub mod dom;
pub mod element;
pub mod error;
pub mod input;
pub mod property;
pub mod trace;
pub mod tree;

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Recording, pretty-printing, and Chrome trace export for arbor
//! diagnostics.
//!
//! This crate provides [`TraceSink`](arbor_core::trace::TraceSink)
//! implementations for development and post-mortem analysis:
//!
//! - [`pretty::PrettyPrintSink`]: human-readable one-line-per-event output,
//!   indented by span nesting.
//! - [`recorder::RecorderSink`]: compact binary recording, stamped on
//!   receipt, with [`recorder::decode`] for playback.
//! - [`chrome::export`]: writes Chrome Trace Event Format JSON from recorded
//!   bytes.
//!
//! The tree itself has no clock, so durations only exist in recordings.

pub mod chrome;
pub mod pretty;
pub mod recorder;

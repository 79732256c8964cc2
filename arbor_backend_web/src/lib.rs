// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for arbor.
//!
//! This crate provides integration with browser APIs:
//!
//! - [`WebDom`]: a [`DomAdapter`] over real `<div>` elements, with native
//!   input listeners feeding an event queue
//! - [`css`]: CSS value formatting and style bindings for property metadata

#![no_std]

extern crate alloc;

pub mod css;
mod dom;

pub use arbor_core::dom::DomAdapter;
pub use dom::{INPUT_EVENTS, InputEvent, WebDom};

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property registry and effective-value storage.
//!
//! Properties are registered once on a tree's [`PropertyRegistry`] and
//! identified by [`PropertyId`]. Any property can be set on any element, which
//! is how attached properties work: a layout panel registers `Column`, and
//! its children carry values for it.
//!
//! Each element stores its values in an [`EffectiveValues`] map. The visual
//! tree reads that map when an element becomes live and replays every value
//! that was actually set through the property's DOM callbacks (see
//! [`VisualTree::reconcile_properties`](crate::tree::VisualTree::reconcile_properties)).

mod metadata;
mod store;
mod value;

pub use metadata::{
    ChangedFn, FireOnLoad, PropertyChange, PropertyId, PropertyMetadata, PropertyRegistry,
    UpdateDomFn, UpdateDomTransitionFn,
};
pub use store::EffectiveValues;
pub use value::{EffectiveEntry, Resolution, Value, ValueSource};

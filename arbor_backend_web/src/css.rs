// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS value formatting and style bindings.
//!
//! The formatters turn property [`Value`]s into CSS text. [`bind_style`]
//! wraps one into an update-DOM callback for
//! [`PropertyMetadata::with_update_dom`](arbor_core::property::PropertyMetadata::with_update_dom):
//!
//! ```ignore
//! let width = tree.register_property(
//!     PropertyMetadata::new("Width", 0.0).with_update_dom(bind_style("width", length)),
//! );
//! ```
//!
//! The callbacks only talk to [`DomAdapter`](arbor_core::dom::DomAdapter), so
//! they work against any adapter, not just [`WebDom`](crate::WebDom).

use alloc::format;
use alloc::string::{String, ToString};

use arbor_core::element::{ElementId, Visibility};
use arbor_core::property::Value;
use arbor_core::tree::VisualTree;
use kurbo::{Insets, Rect};

/// Formats a length in CSS pixels.
#[must_use]
pub fn px(v: f64) -> String {
    format!("{v}px")
}

/// Formats `Int`/`Float` as pixels, `Size` as `"<w>px <h>px"`, and `Insets`
/// in CSS `top right bottom left` order. Strings pass through.
#[must_use]
pub fn length(value: &Value) -> Option<String> {
    match value {
        Value::Int(_) | Value::Float(_) => value.as_f64().map(px),
        Value::Size(size) => Some(format!("{} {}", px(size.width), px(size.height))),
        Value::Insets(insets) => Some(insets_css(*insets)),
        Value::Str(s) => Some(s.to_string()),
        _ => None,
    }
}

/// Formats numbers without a unit (opacity, z-index, flex factors).
#[must_use]
pub fn number(value: &Value) -> Option<String> {
    match value {
        Value::Int(i) => Some(i.to_string()),
        Value::Float(f) => Some(f.to_string()),
        Value::Str(s) => Some(s.to_string()),
        _ => None,
    }
}

/// Formats a [`Visibility`] as a CSS `visibility` keyword.
#[must_use]
pub fn visibility(value: &Value) -> Option<String> {
    match value {
        Value::Visibility(Visibility::Visible) => Some("visible".into()),
        Value::Visibility(Visibility::Collapsed) => Some("hidden".into()),
        _ => None,
    }
}

/// Formats insets in CSS `top right bottom left` order.
#[must_use]
pub fn insets_css(insets: Insets) -> String {
    format!(
        "{} {} {} {}",
        px(insets.y0),
        px(insets.x1),
        px(insets.y1),
        px(insets.x0)
    )
}

/// Formats a rectangle as a CSS `clip-path` relative to its own box.
#[must_use]
pub fn clip_rect(rect: Rect) -> String {
    format!(
        "polygon({x0}px {y0}px, {x1}px {y0}px, {x1}px {y1}px, {x0}px {y1}px)",
        x0 = rect.x0,
        y0 = rect.y0,
        x1 = rect.x1,
        y1 = rect.y1,
    )
}

/// Returns an update-DOM callback that writes `property` on the element's
/// DOM node using `format`.
///
/// Values `format` cannot express clear the inline property.
pub fn bind_style(
    property: &'static str,
    format: fn(&Value) -> Option<String>,
) -> impl Fn(&mut VisualTree, ElementId, &Value) + 'static {
    move |tree: &mut VisualTree, element: ElementId, value: &Value| {
        let Some(node) = tree.dom_handle(element) else {
            return;
        };
        let css = format(value).unwrap_or_default();
        tree.dom_mut().set_style(node, property, &css);
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-tree behaviour switches.
//!
//! A [`TreeConfig`] is owned by each [`VisualTree`](crate::tree::VisualTree)
//! rather than living in process-wide statics, so two trees (or two tests)
//! can run with different settings side by side.

/// Configuration for a [`VisualTree`](crate::tree::VisualTree).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeConfig {
    /// Skip property reconciliation for elements that are not visible when
    /// they are attached. Their properties are pushed to the DOM once they
    /// become visible.
    pub defer_collapsed_rendering: bool,
    /// Emit [`SpanEvent`](crate::trace::SpanEvent) begin/end pairs around
    /// attach, detach, and reconciliation so a sink can time them.
    pub performance_logging: bool,
    /// Tag every created DOM node with a CSS class naming the element type,
    /// which makes the generated markup easier to read in dev tools.
    pub assign_type_class: bool,
}

impl TreeConfig {
    /// Default configuration: collapsed elements are deferred, diagnostics off.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            defer_collapsed_rendering: true,
            performance_logging: false,
            assign_type_class: false,
        }
    }

    /// Configuration with every diagnostic enabled.
    #[must_use]
    pub const fn debug() -> Self {
        Self {
            defer_collapsed_rendering: true,
            performance_logging: true,
            assign_type_class: true,
        }
    }

    /// Returns a copy with deferred rendering of collapsed elements switched
    /// on or off.
    #[must_use]
    pub const fn with_deferred_rendering(mut self, enabled: bool) -> Self {
        self.defer_collapsed_rendering = enabled;
        self
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new()
    }
}

// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property values and their provenance.

use alloc::rc::Rc;

use kurbo::{Insets, Point, Rect, Size};

use crate::element::Visibility;

/// A property value.
///
/// [`Unset`](Self::Unset) is a sentinel, never a stored value: it is passed as
/// the old value to transition callbacks when a value is materialised for the
/// first time.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// No value.
    #[default]
    Unset,
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
    /// A floating-point number.
    Float(f64),
    /// A string.
    Str(Rc<str>),
    /// A size in CSS pixels.
    Size(Size),
    /// A point in CSS pixels.
    Point(Point),
    /// A rectangle in CSS pixels.
    Rect(Rect),
    /// Per-side thickness (margin, padding, border width).
    Insets(Insets),
    /// An element visibility.
    Visibility(Visibility),
}

impl Value {
    /// Returns whether this is the [`Unset`](Self::Unset) sentinel.
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Returns the boolean payload, if any.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the numeric payload of `Int` or `Float` values as `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Returns the string payload, if any.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Str(Rc::from(v))
    }
}

impl From<Size> for Value {
    fn from(v: Size) -> Self {
        Self::Size(v)
    }
}

impl From<Insets> for Value {
    fn from(v: Insets) -> Self {
        Self::Insets(v)
    }
}

impl From<Visibility> for Value {
    fn from(v: Visibility) -> Self {
        Self::Visibility(v)
    }
}

/// Where an effective value came from, lowest precedence first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueSource {
    /// The registered default. An entry with this source was set at some
    /// point and cleared afterwards.
    Default,
    /// Inherited from an ancestor.
    Inherited,
    /// Supplied by a style.
    Style,
    /// Set locally on the element.
    Local,
}

/// How far to resolve a value when reading it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    /// The stored base value, ignoring coercion.
    Base,
    /// The value after coercion; what the DOM should show.
    FullyResolved,
}

/// One stored property entry.
#[derive(Clone, Debug, PartialEq)]
pub struct EffectiveEntry {
    /// The base value.
    pub value: Value,
    /// Where the base value came from.
    pub source: ValueSource,
    /// A coerced replacement for the base value, if any.
    pub coerced: Option<Value>,
}

impl EffectiveEntry {
    /// Creates an uncoerced entry.
    #[must_use]
    pub const fn new(value: Value, source: ValueSource) -> Self {
        Self {
            value,
            source,
            coerced: None,
        }
    }

    /// Returns the value at the requested resolution.
    #[must_use]
    pub fn resolve(&self, resolution: Resolution) -> &Value {
        match (resolution, &self.coerced) {
            (Resolution::FullyResolved, Some(coerced)) => coerced,
            _ => &self.value,
        }
    }
}

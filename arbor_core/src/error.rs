// Copyright 2026 the Arbor Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by visual-tree operations.
//!
//! Every variant signals a bookkeeping bug upstream of the tree (a container
//! that lost track of its children, an element inserted twice) or a failure
//! in the platform DOM. Benign situations, such as attaching to an offscreen
//! parent, are not errors and return `Ok(())`.

use core::fmt;

use crate::dom::DomError;

/// Errors returned by [`VisualTree`](crate::tree::VisualTree) operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeError {
    /// The child is already connected under a different parent.
    AlreadyHasParent {
        /// Type name of the element being attached.
        child: &'static str,
        /// Type name of the parent it is currently attached to.
        current_parent: &'static str,
        /// Type name of the parent the caller asked for.
        requested_parent: &'static str,
    },
    /// The element to detach is live but not recorded under the given parent.
    NotAChild {
        /// Type name of the element being detached.
        child: &'static str,
        /// Type name of the claimed parent.
        parent: &'static str,
    },
    /// The element is still part of a tree and cannot be destroyed.
    StillAttached {
        /// Type name of the element.
        element: &'static str,
    },
    /// A live element has no DOM node to host its children.
    MissingDomNode {
        /// Type name of the element.
        element: &'static str,
    },
    /// The element does not have the behaviour type the caller expected.
    UnexpectedElementType {
        /// The expected type name.
        expected: &'static str,
        /// The type name actually found.
        found: &'static str,
    },
    /// The DOM adapter failed.
    Dom(DomError),
}

impl fmt::Display for TreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyHasParent {
                child,
                current_parent,
                requested_parent,
            } => write!(
                f,
                "the element '{child}' already has a parent ('{current_parent}') and cannot also \
                 be added to '{requested_parent}'; an element cannot appear in multiple locations \
                 in the visual tree, so remove it before adding it elsewhere"
            ),
            Self::NotAChild { child, parent } => write!(
                f,
                "cannot detach the element '{child}' because it is not a child of the element \
                 '{parent}'"
            ),
            Self::StillAttached { element } => {
                write!(f, "the element '{element}' is still attached to a visual tree")
            }
            Self::MissingDomNode { element } => {
                write!(f, "the live element '{element}' has no DOM node")
            }
            Self::UnexpectedElementType { expected, found } => {
                write!(f, "expected a '{expected}' element, found '{found}'")
            }
            Self::Dom(err) => write!(f, "DOM adapter error: {err}"),
        }
    }
}

impl core::error::Error for TreeError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Dom(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DomError> for TreeError {
    fn from(err: DomError) -> Self {
        Self::Dom(err)
    }
}

// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Element identity and trigger keys.

use alloc::string::String;
use core::fmt;

/// A handle to a host element.
///
/// Hosts keep their native element objects in an arena and hand the engine
/// the slot index. Two handles are the same element exactly when their
/// indices are equal.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementId({})", self.0)
    }
}

/// The key a receiver list is stored under.
///
/// A receiver animated by its own visibility is bound to the element itself
/// ([`Physical`](Self::Physical)). A receiver animated by another element is
/// bound to that element's trigger name ([`Named`](Self::Named)).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TriggerKey {
    /// Bound to a specific element.
    Physical(ElementId),
    /// Bound to whichever trigger carries this name.
    Named(String),
}

impl TriggerKey {
    /// Returns `true` if this key names a trigger rather than an element.
    #[inline]
    #[must_use]
    pub const fn is_named(&self) -> bool {
        matches!(self, Self::Named(_))
    }
}

impl From<ElementId> for TriggerKey {
    fn from(element: ElementId) -> Self {
        Self::Physical(element)
    }
}

impl fmt::Debug for TriggerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Physical(id) => write!(f, "Physical({})", id.0),
            Self::Named(name) => write!(f, "Named({name:?})"),
        }
    }
}

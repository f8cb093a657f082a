// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility observer that remembers what it was asked to do.

use alloc::collections::BTreeSet;
use alloc::vec::Vec;

use reveal_core::element::ElementId;
use reveal_core::host::VisibilityObserver;

/// A call made on a [`RecordingObserver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObserverCall {
    /// `observe(element)`.
    Observe(ElementId),
    /// `unobserve(element)`.
    Unobserve(ElementId),
}

/// A [`VisibilityObserver`] that tracks the observed set and logs calls.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    observing: BTreeSet<ElementId>,
    calls: Vec<ObserverCall>,
}

impl RecordingObserver {
    /// Creates an observer watching nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `element` is currently observed.
    #[must_use]
    pub fn is_observing(&self, element: ElementId) -> bool {
        self.observing.contains(&element)
    }

    /// Returns the observed elements in ascending id order.
    pub fn observing(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.observing.iter().copied()
    }

    /// Returns every call, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[ObserverCall] {
        &self.calls
    }

    /// Returns how many times `call` was made.
    #[must_use]
    pub fn count(&self, call: ObserverCall) -> usize {
        self.calls.iter().filter(|&&c| c == call).count()
    }
}

impl VisibilityObserver for RecordingObserver {
    fn observe(&mut self, element: ElementId) {
        self.calls.push(ObserverCall::Observe(element));
        self.observing.insert(element);
    }

    fn unobserve(&mut self, element: ElementId) {
        self.calls.push(ObserverCall::Unobserve(element));
        self.observing.remove(&element);
    }
}

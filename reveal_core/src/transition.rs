// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition lifecycle tracking.
//!
//! A [`TransitionTracker`] brackets a reveal with a marker class. The marker
//! usually carries the transition timing (delay, duration, easing) for the
//! scroll-driven entrance, so that hover transitions on the same element can
//! use different timings once the entrance has finished.
//!
//! ```text
//!          begin()                      end/cancel with running == 1
//!   Idle ───────────► Transitioning ─────────────────────────────► Idle
//!                      │        ▲
//!                      └────────┘
//!                  start: running += 1
//!                  end/cancel: running -= 1
//! ```
//!
//! The running count never goes below zero. An end or cancel without a
//! matching start is ignored, which covers a cancel racing a completed end,
//! and transitions that were already running when tracking began.

use alloc::string::String;

use crate::element::ElementId;
use crate::host::ElementMutator;

/// A transition event reported by the host for a tracked element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionSignal {
    /// `transitionstart`.
    Start,
    /// `transitionend`.
    End,
    /// `transitioncancel`.
    Cancel,
}

/// Lifecycle phase of a [`TransitionTracker`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    /// No marker, no listeners.
    #[default]
    Idle,
    /// Marker applied, counting transitions.
    Transitioning,
}

/// Adds a marker class to an element and removes it once every transition
/// started on the element has ended.
#[derive(Clone, Debug)]
pub struct TransitionTracker {
    element: ElementId,
    marker: String,
    running: u32,
    phase: TransitionPhase,
}

impl TransitionTracker {
    /// Creates an idle tracker for `element` using `marker` as the class.
    #[must_use]
    pub fn new(element: ElementId, marker: impl Into<String>) -> Self {
        Self {
            element,
            marker: marker.into(),
            running: 0,
            phase: TransitionPhase::Idle,
        }
    }

    /// Returns the tracked element.
    #[must_use]
    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Returns the number of transitions currently in flight.
    #[must_use]
    pub fn running(&self) -> u32 {
        self.running
    }

    /// Applies the marker class and starts listening for transitions.
    ///
    /// Returns `false` without side effects if the tracker is already
    /// transitioning.
    pub fn begin<M: ElementMutator + ?Sized>(&mut self, dom: &mut M) -> bool {
        if self.phase == TransitionPhase::Transitioning {
            return false;
        }
        self.running = 0;
        self.phase = TransitionPhase::Transitioning;
        dom.add_class(self.element, &self.marker);
        dom.listen_transitions(self.element);
        true
    }

    /// Applies a transition signal.
    ///
    /// Returns `true` if this signal ended the last running transition, in
    /// which case the marker has been removed, the listeners detached and the
    /// tracker is idle again. Signals received while idle are ignored.
    pub fn signal<M: ElementMutator + ?Sized>(
        &mut self,
        signal: TransitionSignal,
        dom: &mut M,
    ) -> bool {
        if self.phase == TransitionPhase::Idle {
            return false;
        }
        match signal {
            TransitionSignal::Start => {
                self.running = self.running.saturating_add(1);
                false
            }
            TransitionSignal::End | TransitionSignal::Cancel => {
                if self.running == 0 {
                    return false;
                }
                self.running -= 1;
                if self.running > 0 {
                    return false;
                }
                dom.remove_class(self.element, &self.marker);
                dom.unlisten_transitions(self.element);
                self.phase = TransitionPhase::Idle;
                true
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec::Vec;

    /// Records every mutation as a readable op.
    #[derive(Debug, Default)]
    pub(crate) struct MutationLog {
        pub(crate) ops: Vec<(ElementId, &'static str, String)>,
    }

    impl MutationLog {
        pub(crate) fn has_class(&self, element: ElementId, class: &str) -> bool {
            let mut present = false;
            for (el, op, name) in &self.ops {
                if *el == element && name == class {
                    present = *op == "add";
                }
            }
            present
        }

        pub(crate) fn listening(&self, element: ElementId) -> bool {
            let mut on = false;
            for (el, op, _) in &self.ops {
                if *el == element {
                    match *op {
                        "listen" => on = true,
                        "unlisten" => on = false,
                        _ => {}
                    }
                }
            }
            on
        }
    }

    impl ElementMutator for MutationLog {
        fn add_class(&mut self, element: ElementId, class: &str) {
            self.ops.push((element, "add", String::from(class)));
        }

        fn remove_class(&mut self, element: ElementId, class: &str) {
            self.ops.push((element, "remove", String::from(class)));
        }

        fn listen_transitions(&mut self, element: ElementId) {
            self.ops.push((element, "listen", String::new()));
        }

        fn unlisten_transitions(&mut self, element: ElementId) {
            self.ops.push((element, "unlisten", String::new()));
        }
    }

    const EL: ElementId = ElementId(7);

    #[test]
    fn begin_sets_marker_and_listens() {
        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "is-transitioning");
        assert!(tracker.begin(&mut dom));
        assert!(dom.has_class(EL, "is-transitioning"));
        assert!(dom.listening(EL));
        assert_eq!(tracker.phase(), TransitionPhase::Transitioning);
    }

    #[test]
    fn marker_stays_until_last_transition_ends() {
        use TransitionSignal::{End, Start};

        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "is-transitioning");
        tracker.begin(&mut dom);

        let mut counts = Vec::new();
        let mut finished = Vec::new();
        for signal in [Start, Start, End, Start, End, End] {
            finished.push(tracker.signal(signal, &mut dom));
            counts.push(tracker.running());
        }
        assert_eq!(counts, [1, 2, 1, 2, 1, 0]);
        assert_eq!(finished, [false, false, false, false, false, true]);
        assert!(!dom.has_class(EL, "is-transitioning"));
        assert!(!dom.listening(EL));
        assert_eq!(tracker.phase(), TransitionPhase::Idle);
    }

    #[test]
    fn cancel_counts_as_an_ending() {
        use TransitionSignal::{Cancel, End, Start};

        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "is-transitioning");
        tracker.begin(&mut dom);

        for signal in [Start, Start, End, Start, Cancel] {
            tracker.signal(signal, &mut dom);
        }
        // One transition is still running.
        assert!(dom.has_class(EL, "is-transitioning"));
        assert!(tracker.signal(End, &mut dom));
        assert!(!dom.has_class(EL, "is-transitioning"));
    }

    #[test]
    fn unmatched_endings_never_go_negative() {
        use TransitionSignal::{Cancel, End, Start};

        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "m");
        tracker.begin(&mut dom);

        assert!(!tracker.signal(Cancel, &mut dom));
        assert!(!tracker.signal(End, &mut dom));
        assert_eq!(tracker.running(), 0);
        assert!(dom.has_class(EL, "m"), "unmatched end must not finish");

        tracker.signal(Start, &mut dom);
        assert!(tracker.signal(End, &mut dom));
        // Stray signals after finishing are ignored.
        assert!(!tracker.signal(Cancel, &mut dom));
        assert!(!tracker.signal(Start, &mut dom));
        assert_eq!(tracker.running(), 0);
    }

    #[test]
    fn begin_while_transitioning_is_a_no_op() {
        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "m");
        tracker.begin(&mut dom);
        tracker.signal(TransitionSignal::Start, &mut dom);
        let ops = dom.ops.len();

        assert!(!tracker.begin(&mut dom));
        assert_eq!(dom.ops.len(), ops);
        assert_eq!(tracker.running(), 1);
    }

    #[test]
    fn tracker_can_restart() {
        let mut dom = MutationLog::default();
        let mut tracker = TransitionTracker::new(EL, "m");
        tracker.begin(&mut dom);
        tracker.signal(TransitionSignal::Start, &mut dom);
        tracker.signal(TransitionSignal::End, &mut dom);

        assert!(tracker.begin(&mut dom));
        assert!(dom.has_class(EL, "m"));
    }
}

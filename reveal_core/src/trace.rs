// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the reveal pipeline.
//!
//! This module provides a [`TraceSink`] trait with one method per pipeline
//! event. All method bodies default to no-ops, so implementing only the
//! events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Registration events carry no timestamp: registration runs before any
//! clock-driven work and the registry has no access to the host clock.

use crate::element::ElementId;
use crate::time::{HostTime, Millis};
use crate::transition::TransitionSignal;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Which class change was applied to an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassChange {
    /// The transitioning marker was added.
    MarkerAdded,
    /// The visible class was added.
    VisibleAdded,
    /// The transitioning marker was removed after the last transition ended.
    MarkerRemoved,
}

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when the registry stores a new trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriggerRegisteredEvent {
    /// The trigger element.
    pub trigger: ElementId,
    /// Its stagger.
    pub stagger: Millis,
    /// Whether the trigger carries a name for foreign receivers.
    pub named: bool,
}

/// Emitted when the registry appends a receiver record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverRegisteredEvent {
    /// The receiver element.
    pub receiver: ElementId,
    /// Whether the receiver is bound to a trigger name rather than itself.
    pub named: bool,
    /// Its delay.
    pub delay: Millis,
}

/// Emitted after a batch of intersection entries has been processed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchEvent {
    /// Host time the batch was processed at.
    pub at: HostTime,
    /// Number of entries in the batch.
    pub entries: u32,
    /// Number of entries that qualified as visible.
    pub qualified: u32,
    /// Final cumulative stagger of the batch.
    pub cumulative: Millis,
}

/// Emitted when a trigger's "visible" event is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleScheduledEvent {
    /// Host time of scheduling.
    pub at: HostTime,
    /// The trigger element.
    pub trigger: ElementId,
    /// Delay until emission (the batch's cumulative stagger so far).
    pub delay: Millis,
}

/// Emitted when a trigger's "visible" event fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VisibleEvent {
    /// Host time of emission.
    pub at: HostTime,
    /// The trigger element.
    pub trigger: ElementId,
    /// Number of receivers dispatched for it.
    pub receivers: u32,
}

/// Emitted when a receiver's class flip is scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReceiverScheduledEvent {
    /// Host time of scheduling.
    pub at: HostTime,
    /// The trigger that became visible.
    pub trigger: ElementId,
    /// The receiver element.
    pub receiver: ElementId,
    /// The receiver's delay.
    pub delay: Millis,
}

/// Emitted when a class is added to or removed from an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassChangedEvent {
    /// Host time of the change.
    pub at: HostTime,
    /// The element.
    pub element: ElementId,
    /// What changed.
    pub change: ClassChange,
}

/// Emitted when a tracked element reports a transition signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransitionSignalEvent {
    /// Host time of the signal.
    pub at: HostTime,
    /// The element.
    pub element: ElementId,
    /// The signal.
    pub signal: TransitionSignal,
    /// In-flight transition count after the signal was applied.
    pub running: u32,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a trigger is registered.
    fn on_trigger_registered(&mut self, e: &TriggerRegisteredEvent) {
        _ = e;
    }

    /// Called when a receiver is registered.
    fn on_receiver_registered(&mut self, e: &ReceiverRegisteredEvent) {
        _ = e;
    }

    /// Called after an intersection batch is processed.
    fn on_batch(&mut self, e: &BatchEvent) {
        _ = e;
    }

    /// Called when a "visible" emission is scheduled.
    fn on_visible_scheduled(&mut self, e: &VisibleScheduledEvent) {
        _ = e;
    }

    /// Called when a "visible" event fires.
    fn on_visible(&mut self, e: &VisibleEvent) {
        _ = e;
    }

    /// Called when a receiver's class flip is scheduled.
    fn on_receiver_scheduled(&mut self, e: &ReceiverScheduledEvent) {
        _ = e;
    }

    /// Called when a class is added or removed.
    fn on_class_changed(&mut self, e: &ClassChangedEvent) {
        _ = e;
    }

    /// Called when a transition signal reaches a tracker.
    fn on_transition_signal(&mut self, e: &TransitionSignalEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

/// Generates a `Tracer` method that forwards one event to the sink.
macro_rules! forward {
    ($(#[$doc:meta])* $name:ident => $sink_method:ident($event:ty)) => {
        $(#[$doc])*
        #[inline]
        pub fn $name(&mut self, e: &$event) {
            #[cfg(feature = "trace")]
            if let Some(s) = &mut self.sink {
                s.$sink_method(e);
            }
            #[cfg(not(feature = "trace"))]
            {
                _ = e;
            }
        }
    };
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    forward!(
        /// Emits a [`TriggerRegisteredEvent`].
        trigger_registered => on_trigger_registered(TriggerRegisteredEvent)
    );
    forward!(
        /// Emits a [`ReceiverRegisteredEvent`].
        receiver_registered => on_receiver_registered(ReceiverRegisteredEvent)
    );
    forward!(
        /// Emits a [`BatchEvent`].
        batch => on_batch(BatchEvent)
    );
    forward!(
        /// Emits a [`VisibleScheduledEvent`].
        visible_scheduled => on_visible_scheduled(VisibleScheduledEvent)
    );
    forward!(
        /// Emits a [`VisibleEvent`].
        visible => on_visible(VisibleEvent)
    );
    forward!(
        /// Emits a [`ReceiverScheduledEvent`].
        receiver_scheduled => on_receiver_scheduled(ReceiverScheduledEvent)
    );
    forward!(
        /// Emits a [`ClassChangedEvent`].
        class_changed => on_class_changed(ClassChangedEvent)
    );
    forward!(
        /// Emits a [`TransitionSignalEvent`].
        transition_signal => on_transition_signal(TransitionSignalEvent)
    );
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_visible() -> VisibleEvent {
        VisibleEvent {
            at: HostTime(1_000),
            trigger: ElementId(3),
            receivers: 2,
        }
    }

    #[test]
    fn noop_sink_accepts_everything() {
        let mut sink = NoopSink;
        sink.on_visible(&sample_visible());
        sink.on_class_changed(&ClassChangedEvent {
            at: HostTime(0),
            element: ElementId(1),
            change: ClassChange::MarkerAdded,
        });
    }

    #[test]
    fn tracer_none_does_nothing() {
        let mut tracer = Tracer::none();
        tracer.visible(&sample_visible());
        tracer.batch(&BatchEvent {
            at: HostTime(0),
            entries: 4,
            qualified: 1,
            cumulative: Millis(0),
        });
    }

    #[cfg(feature = "trace")]
    #[test]
    fn tracer_dispatches_to_sink() {
        use alloc::vec::Vec;

        struct RecordingSink {
            visible: Vec<ElementId>,
        }
        impl TraceSink for RecordingSink {
            fn on_visible(&mut self, e: &VisibleEvent) {
                self.visible.push(e.trigger);
            }
        }

        let mut sink = RecordingSink {
            visible: Vec::new(),
        };
        {
            let mut tracer = Tracer::new(&mut sink);
            tracer.visible(&sample_visible());
        }
        assert_eq!(sink.visible, &[ElementId(3)]);
    }
}

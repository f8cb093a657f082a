// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr). Host times
//! are printed in milliseconds.

use std::io::Write;

use reveal_core::time::HostTime;
use reveal_core::trace::{
    BatchEvent, ClassChange, ClassChangedEvent, ReceiverRegisteredEvent, ReceiverScheduledEvent,
    TraceSink, TransitionSignalEvent, TriggerRegisteredEvent, VisibleEvent,
    VisibleScheduledEvent,
};
use reveal_core::transition::TransitionSignal;

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink").finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self {
            writer: Box::new(std::io::stderr()),
        }
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self { writer }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }

    /// Consumes the sink and returns the destination.
    pub fn into_writer(self) -> W {
        self.writer
    }
}

fn ms(t: HostTime) -> f64 {
    t.micros() as f64 / 1000.0
}

fn change_name(change: ClassChange) -> &'static str {
    match change {
        ClassChange::MarkerAdded => "+marker",
        ClassChange::VisibleAdded => "+visible",
        ClassChange::MarkerRemoved => "-marker",
    }
}

fn signal_name(signal: TransitionSignal) -> &'static str {
    match signal {
        TransitionSignal::Start => "start",
        TransitionSignal::End => "end",
        TransitionSignal::Cancel => "cancel",
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_trigger_registered(&mut self, e: &TriggerRegisteredEvent) {
        let _ = writeln!(
            self.writer,
            "[register:trigger] el={} stagger={}ms named={}",
            e.trigger.0,
            e.stagger.get(),
            e.named,
        );
    }

    fn on_receiver_registered(&mut self, e: &ReceiverRegisteredEvent) {
        let _ = writeln!(
            self.writer,
            "[register:receiver] el={} delay={}ms named={}",
            e.receiver.0,
            e.delay.get(),
            e.named,
        );
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        let _ = writeln!(
            self.writer,
            "[batch] at {:.1}ms entries={} qualified={} cumulative={}ms",
            ms(e.at),
            e.entries,
            e.qualified,
            e.cumulative.get(),
        );
    }

    fn on_visible_scheduled(&mut self, e: &VisibleScheduledEvent) {
        let _ = writeln!(
            self.writer,
            "[visible:scheduled] el={} at {:.1}ms in {}ms",
            e.trigger.0,
            ms(e.at),
            e.delay.get(),
        );
    }

    fn on_visible(&mut self, e: &VisibleEvent) {
        let _ = writeln!(
            self.writer,
            "[visible] el={} at {:.1}ms receivers={}",
            e.trigger.0,
            ms(e.at),
            e.receivers,
        );
    }

    fn on_receiver_scheduled(&mut self, e: &ReceiverScheduledEvent) {
        let _ = writeln!(
            self.writer,
            "[receiver] el={} trigger={} at {:.1}ms in {}ms",
            e.receiver.0,
            e.trigger.0,
            ms(e.at),
            e.delay.get(),
        );
    }

    fn on_class_changed(&mut self, e: &ClassChangedEvent) {
        let _ = writeln!(
            self.writer,
            "[class] el={} {} at {:.1}ms",
            e.element.0,
            change_name(e.change),
            ms(e.at),
        );
    }

    fn on_transition_signal(&mut self, e: &TransitionSignalEvent) {
        let _ = writeln!(
            self.writer,
            "[transition] el={} {} at {:.1}ms running={}",
            e.element.0,
            signal_name(e.signal),
            ms(e.at),
            e.running,
        );
    }
}

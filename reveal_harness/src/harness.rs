// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The engine wired to in-memory hosts.

use reveal_core::element::ElementId;
use reveal_core::engine::{Engine, RevealConfig};
use reveal_core::host::TaskScheduler;
use reveal_core::trace::{NoopSink, TraceSink, Tracer};
use reveal_core::transition::TransitionSignal;
use reveal_core::watcher::IntersectionEntry;

use crate::document::FakeDocument;
use crate::observer::RecordingObserver;
use crate::scheduler::{FRAME_INTERVAL_MS, VirtualScheduler};

/// An [`Engine`] driven by a [`FakeDocument`], a [`VirtualScheduler`] and a
/// [`RecordingObserver`].
///
/// Nothing happens on its own: time moves only through
/// [`advance`](Self::advance), [`frame`](Self::frame) and
/// [`settle`](Self::settle), and visibility changes only through
/// [`intersect`](Self::intersect).
///
/// Engine trace events go to `S`. They are only emitted when `reveal_core`
/// is built with its `trace` feature.
#[derive(Debug)]
pub struct Harness<S: TraceSink = NoopSink> {
    /// The engine under test.
    pub engine: Engine,
    /// The element tree.
    pub document: FakeDocument,
    /// Timers, frames and the clock.
    pub scheduler: VirtualScheduler,
    /// Observation calls.
    pub observer: RecordingObserver,
    sink: S,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl Harness {
    /// Creates a harness with an empty document, discarding trace events.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self::with_sink(config, NoopSink)
    }
}

impl<S: TraceSink> Harness<S> {
    /// Creates a harness that reports trace events to `sink`.
    #[must_use]
    pub fn with_sink(config: RevealConfig, sink: S) -> Self {
        Self {
            engine: Engine::new(config),
            document: FakeDocument::new(),
            scheduler: VirtualScheduler::new(),
            observer: RecordingObserver::new(),
            sink,
        }
    }

    /// Returns the trace sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the harness and returns the trace sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Returns the virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Registers the triggers and receivers below `container`.
    pub fn register(&mut self, container: ElementId) -> usize {
        let mut tracer = Tracer::new(&mut self.sink);
        self.engine
            .register(container, &self.document, &mut self.observer, &mut tracer)
    }

    /// Delivers one observer batch.
    pub fn intersect(&mut self, entries: &[IntersectionEntry]) -> usize {
        let mut tracer = Tracer::new(&mut self.sink);
        self.engine.handle_intersections(
            entries,
            &mut self.observer,
            &mut self.scheduler,
            &mut tracer,
        )
    }

    /// Delivers one observer batch built from `(element, visible fraction)`
    /// pairs. Heights come from the document; a fraction of zero means not
    /// intersecting.
    pub fn scroll(&mut self, visible: &[(ElementId, f64)]) -> usize {
        let entries: alloc::vec::Vec<_> = visible
            .iter()
            .map(|&(element, fraction)| {
                IntersectionEntry::new(
                    element,
                    fraction > 0.0,
                    fraction,
                    self.document.height(element),
                )
            })
            .collect();
        self.intersect(&entries)
    }

    /// Moves the clock forward by `ms`, firing due timers in deadline order.
    ///
    /// Timers set by a firing timer run in the same call if they fall due
    /// within the window. Returns the number of timers fired.
    pub fn advance(&mut self, ms: u64) -> usize {
        let until = self.scheduler.now_ms().saturating_add(ms);
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(until) {
            let mut tracer = Tracer::new(&mut self.sink);
            self.engine
                .run_task(task, &mut self.document, &mut self.scheduler, &mut tracer);
            fired += 1;
        }
        self.scheduler.set_now(until);
        fired
    }

    /// Advances one frame interval, then runs the tasks queued for this
    /// frame. Returns the number of frame tasks run.
    pub fn frame(&mut self) -> usize {
        self.advance(FRAME_INTERVAL_MS);
        let tasks = self.scheduler.take_frame();
        let ran = tasks.len();
        for task in tasks {
            let mut tracer = Tracer::new(&mut self.sink);
            self.engine
                .run_task(task, &mut self.document, &mut self.scheduler, &mut tracer);
        }
        ran
    }

    /// Runs timers and frames until both queues are empty.
    pub fn settle(&mut self) {
        loop {
            if self.scheduler.pending_frame_tasks() > 0 {
                self.frame();
            } else if let Some(deadline) = self.scheduler.next_deadline() {
                let wait = deadline.saturating_sub(self.scheduler.now_ms());
                self.advance(wait);
            } else {
                break;
            }
        }
    }

    /// Delivers a transition signal, as the browser would, only if
    /// transition listeners are attached to `element`.
    pub fn transition(&mut self, element: ElementId, signal: TransitionSignal) -> bool {
        if !self.document.is_listening(element) {
            return false;
        }
        let mut tracer = Tracer::new(&mut self.sink);
        self.engine.transition_signal(
            element,
            signal,
            &mut self.document,
            &self.scheduler,
            &mut tracer,
        )
    }

    /// Returns the current host time reported to the engine.
    #[must_use]
    pub fn host_time(&self) -> reveal_core::time::HostTime {
        self.scheduler.now()
    }
}

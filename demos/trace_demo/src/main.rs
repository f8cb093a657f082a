// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Simulated scroll through a page of reveal elements.
//!
//! Drives the engine through the in-memory harness, recording events to both
//! a [`PrettyPrintSink`](reveal_debug::pretty::PrettyPrintSink) and a
//! [`RecorderSink`](reveal_debug::recorder::RecorderSink), then exports a
//! Chrome trace JSON file.

use std::fs::File;
use std::io::BufWriter;

use reveal_core::element::ElementId;
use reveal_core::engine::RevealConfig;
use reveal_core::trace::{
    BatchEvent, ClassChangedEvent, ReceiverRegisteredEvent, ReceiverScheduledEvent, TraceSink,
    TransitionSignalEvent, TriggerRegisteredEvent, VisibleEvent, VisibleScheduledEvent,
};
use reveal_core::transition::TransitionSignal;
use reveal_debug::pretty::PrettyPrintSink;
use reveal_debug::recorder::RecorderSink;
use reveal_harness::Harness;

const CLASS: &str = "data-visible-class";
const NAME: &str = "data-element-name";
const FOREIGN: &str = "data-foreign-trigger";
const STAGGER: &str = "data-stagger";
const DELAY: &str = "data-delay";

/// Scroll position step per simulated frame, in pixels.
const SCROLL_STEP: f64 = 40.0;
const VIEWPORT: f64 = 800.0;

/// Forwards every event to two sinks.
struct Tee<A, B>(A, B);

impl<A: TraceSink, B: TraceSink> TraceSink for Tee<A, B> {
    fn on_trigger_registered(&mut self, e: &TriggerRegisteredEvent) {
        self.0.on_trigger_registered(e);
        self.1.on_trigger_registered(e);
    }

    fn on_receiver_registered(&mut self, e: &ReceiverRegisteredEvent) {
        self.0.on_receiver_registered(e);
        self.1.on_receiver_registered(e);
    }

    fn on_batch(&mut self, e: &BatchEvent) {
        self.0.on_batch(e);
        self.1.on_batch(e);
    }

    fn on_visible_scheduled(&mut self, e: &VisibleScheduledEvent) {
        self.0.on_visible_scheduled(e);
        self.1.on_visible_scheduled(e);
    }

    fn on_visible(&mut self, e: &VisibleEvent) {
        self.0.on_visible(e);
        self.1.on_visible(e);
    }

    fn on_receiver_scheduled(&mut self, e: &ReceiverScheduledEvent) {
        self.0.on_receiver_scheduled(e);
        self.1.on_receiver_scheduled(e);
    }

    fn on_class_changed(&mut self, e: &ClassChangedEvent) {
        self.0.on_class_changed(e);
        self.1.on_class_changed(e);
    }

    fn on_transition_signal(&mut self, e: &TransitionSignalEvent) {
        self.0.on_transition_signal(e);
        self.1.on_transition_signal(e);
    }
}

/// A page element stacked at `top` with the given height.
struct Placed {
    id: ElementId,
    top: f64,
    height: f64,
}

impl Placed {
    /// Fraction of the element inside a viewport starting at `scroll`.
    fn visible_fraction(&self, scroll: f64) -> f64 {
        let start = self.top.max(scroll);
        let end = (self.top + self.height).min(scroll + VIEWPORT);
        ((end - start) / self.height).clamp(0.0, 1.0)
    }
}

fn main() {
    let sink = Tee(PrettyPrintSink::with_writer(std::io::stdout()), RecorderSink::new());
    let config = RevealConfig::default().with_transitioning_class("is-transitioning");
    let mut h = Harness::with_sink(config, sink);

    // -- page --------------------------------------------------------------
    let root = h.document.root();
    let container = h.document.append(root, &[("class", "animationContainer")]);
    let layout: [(&[(&str, &str)], f64); 6] = [
        (&[(CLASS, "fade-in")], 300.0),
        (&[(CLASS, "slide-up"), (NAME, "hero")], 600.0),
        (&[(CLASS, "pop"), (FOREIGN, "hero"), (DELAY, "150")], 120.0),
        (&[(CLASS, "card")], 400.0),
        (&[(CLASS, "card"), (STAGGER, "80")], 400.0),
        (&[(CLASS, "gallery")], 2400.0),
    ];
    let mut top = VIEWPORT;
    let mut placed = Vec::new();
    for (attrs, height) in layout {
        let id = h.document.append(container, attrs);
        h.document.set_height(id, height);
        placed.push(Placed { id, top, height });
        top += height;
    }
    let page_end = top;

    h.register(container);

    // -- simulated scroll --------------------------------------------------
    let mut scroll = 0.0;
    while scroll < page_end {
        let visible: Vec<_> = placed
            .iter()
            .filter(|p| h.observer.is_observing(p.id))
            .map(|p| (p.id, p.visible_fraction(scroll)))
            .filter(|&(_, fraction)| fraction > 0.0)
            .collect();
        if !visible.is_empty() {
            h.scroll(&visible);
        }
        h.frame();
        scroll += SCROLL_STEP;
    }
    h.settle();

    // Every revealed element runs one CSS transition on its visible class.
    for p in &placed {
        if h.document.is_listening(p.id) {
            h.transition(p.id, TransitionSignal::Start);
            h.advance(300);
            h.transition(p.id, TransitionSignal::End);
        }
    }

    // -- export Chrome trace -----------------------------------------------
    let Tee(_, recorder) = h.into_sink();
    let path = "trace.json";
    let result = File::create(path).and_then(|file| {
        let mut writer = BufWriter::new(file);
        reveal_debug::chrome::export(recorder.as_bytes(), &mut writer)
    });
    match result {
        Ok(()) => println!("Wrote {path} ({} elements)", placed.len()),
        Err(err) => eprintln!("failed to write {path}: {err}"),
    }
}

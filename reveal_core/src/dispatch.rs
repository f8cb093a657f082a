// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Receiver dispatch.
//!
//! When a trigger's "visible" event fires, the [`Dispatcher`] schedules one
//! class flip per receiver, each after that receiver's own delay. A flip
//! takes two frames: the first starts a [`TransitionTracker`] (if a
//! transitioning class is configured), the second adds the visible class.
//! The marker therefore lands at least one frame before the class that
//! starts the transition it times.

use alloc::collections::BTreeMap;
use alloc::string::String;

use crate::element::ElementId;
use crate::host::{ElementMutator, TaskScheduler};
use crate::registry::ElementRegistry;
use crate::task::{ClassFlip, Task};
use crate::trace::{
    ClassChange, ClassChangedEvent, ReceiverScheduledEvent, TransitionSignalEvent, Tracer,
    VisibleEvent,
};
use crate::transition::{TransitionSignal, TransitionTracker};

/// Turns "visible" events into receiver class flips.
#[derive(Debug, Default)]
pub struct Dispatcher {
    transitioning_class: Option<String>,
    trackers: BTreeMap<ElementId, TransitionTracker>,
}

impl Dispatcher {
    /// Creates a dispatcher. An empty `transitioning_class` disables
    /// tracking, like `None`.
    #[must_use]
    pub fn new(transitioning_class: Option<String>) -> Self {
        Self {
            transitioning_class: transitioning_class.filter(|class| !class.is_empty()),
            trackers: BTreeMap::new(),
        }
    }

    /// Returns the transitioning marker class, if tracking is enabled.
    #[must_use]
    pub fn transitioning_class(&self) -> Option<&str> {
        self.transitioning_class.as_deref()
    }

    /// Returns the active tracker of `element`, if any.
    #[must_use]
    pub fn tracker(&self, element: ElementId) -> Option<&TransitionTracker> {
        self.trackers.get(&element)
    }

    /// Returns the number of elements with a transition in progress.
    #[must_use]
    pub fn active_trackers(&self) -> usize {
        self.trackers.len()
    }

    /// Returns the elements with a transition in progress, in handle order.
    pub fn tracked_elements(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.trackers.keys().copied()
    }

    /// Detaches the transition listeners of every active tracker and forgets
    /// the trackers. Marker classes are left in place.
    ///
    /// Returns the number of elements released.
    pub fn release_listeners<M: ElementMutator + ?Sized>(&mut self, dom: &mut M) -> usize {
        let trackers = core::mem::take(&mut self.trackers);
        for &element in trackers.keys() {
            dom.unlisten_transitions(element);
        }
        trackers.len()
    }

    /// Schedules the class flip of every receiver of `trigger`.
    ///
    /// Receivers without a visible class are skipped. Returns the number of
    /// flips scheduled.
    pub fn on_visible<S>(
        &mut self,
        trigger: ElementId,
        registry: &ElementRegistry,
        scheduler: &mut S,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        S: TaskScheduler + ?Sized,
    {
        let at = scheduler.now();
        let mut scheduled: u32 = 0;
        for receiver in registry.receivers_for(trigger) {
            let Some(class) = &receiver.visible_class else {
                continue;
            };
            tracer.receiver_scheduled(&ReceiverScheduledEvent {
                at,
                trigger,
                receiver: receiver.element,
                delay: receiver.delay,
            });
            scheduler.set_timeout(
                receiver.delay,
                Task::Reveal(ClassFlip {
                    element: receiver.element,
                    visible_class: class.clone(),
                }),
            );
            scheduled += 1;
        }
        tracer.visible(&VisibleEvent {
            at,
            trigger,
            receivers: scheduled,
        });
        scheduled as usize
    }

    /// Runs one step of a class flip.
    ///
    /// [`Task::Visible`] belongs to the engine and is ignored here.
    pub fn run_flip<M, S>(
        &mut self,
        task: Task,
        dom: &mut M,
        scheduler: &mut S,
        tracer: &mut Tracer<'_>,
    ) where
        M: ElementMutator + ?Sized,
        S: TaskScheduler + ?Sized,
    {
        match task {
            Task::Visible(_) => {}
            Task::Reveal(flip) => scheduler.request_frame(Task::Mark(flip)),
            Task::Mark(flip) => {
                if let Some(marker) = &self.transitioning_class {
                    let element = flip.element;
                    let tracker = self
                        .trackers
                        .entry(element)
                        .or_insert_with(|| TransitionTracker::new(element, marker.clone()));
                    if tracker.begin(dom) {
                        tracer.class_changed(&ClassChangedEvent {
                            at: scheduler.now(),
                            element,
                            change: ClassChange::MarkerAdded,
                        });
                    }
                }
                scheduler.request_frame(Task::Apply(flip));
            }
            Task::Apply(flip) => {
                dom.add_class(flip.element, &flip.visible_class);
                tracer.class_changed(&ClassChangedEvent {
                    at: scheduler.now(),
                    element: flip.element,
                    change: ClassChange::VisibleAdded,
                });
            }
        }
    }

    /// Feeds a transition signal to the tracker of `element`.
    ///
    /// Signals for elements without an active tracker are ignored. Returns
    /// `true` if the signal ended the element's last running transition.
    pub fn transition_signal<M, S>(
        &mut self,
        element: ElementId,
        signal: TransitionSignal,
        dom: &mut M,
        scheduler: &S,
        tracer: &mut Tracer<'_>,
    ) -> bool
    where
        M: ElementMutator + ?Sized,
        S: TaskScheduler + ?Sized,
    {
        let Some(tracker) = self.trackers.get_mut(&element) else {
            return false;
        };
        let finished = tracker.signal(signal, dom);
        let at = scheduler.now();
        tracer.transition_signal(&TransitionSignalEvent {
            at,
            element,
            signal,
            running: tracker.running(),
        });
        if finished {
            self.trackers.remove(&element);
            tracer.class_changed(&ClassChangedEvent {
                at,
                element,
                change: ClassChange::MarkerRemoved,
            });
        }
        finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::FlatDoc;
    use crate::time::Millis;
    use crate::transition::tests::MutationLog;
    use crate::watcher::tests::TaskLog;
    use alloc::vec::Vec;

    fn registry(doc: &FlatDoc) -> ElementRegistry {
        let mut registry = ElementRegistry::default();
        registry.register(ElementId(0), doc, &mut |_: ElementId| {}, &mut Tracer::none());
        registry
    }

    /// Drives one flip through all three steps.
    fn flip_through(
        dispatcher: &mut Dispatcher,
        task: Task,
        dom: &mut MutationLog,
        tasks: &mut TaskLog,
    ) {
        let mut tracer = Tracer::none();
        dispatcher.run_flip(task, dom, tasks, &mut tracer);
        let mark = tasks.frames.remove(0);
        dispatcher.run_flip(mark, dom, tasks, &mut tracer);
        let apply = tasks.frames.remove(0);
        dispatcher.run_flip(apply, dom, tasks, &mut tracer);
    }

    fn flip(element: ElementId, class: &str) -> Task {
        Task::Reveal(ClassFlip {
            element,
            visible_class: String::from(class),
        })
    }

    #[test]
    fn receiver_delays_are_independent() {
        let mut doc = FlatDoc::new();
        let t = doc.push(&[("data-visible-class", "t"), ("data-element-name", "hero")]);
        let a = doc.push(&[
            ("data-visible-class", "a"),
            ("data-foreign-trigger", "hero"),
            ("data-delay", "300"),
        ]);
        let b = doc.push(&[("data-visible-class", "b"), ("data-foreign-trigger", "hero")]);
        let registry = registry(&doc);

        let mut dispatcher = Dispatcher::new(None);
        let mut tasks = TaskLog::default();
        let n = dispatcher.on_visible(t, &registry, &mut tasks, &mut Tracer::none());

        assert_eq!(n, 3);
        assert_eq!(
            tasks.timeouts,
            [
                (Millis(0), flip(t, "t")),
                (Millis(300), flip(a, "a")),
                (Millis(0), flip(b, "b")),
            ]
        );
    }

    #[test]
    fn receivers_without_class_are_skipped() {
        let mut doc = FlatDoc::new();
        let t = doc.push(&[("data-element-name", "hero")]);
        doc.push(&[("data-visible-class", ""), ("data-foreign-trigger", "hero")]);
        let registry = registry(&doc);

        let mut dispatcher = Dispatcher::new(Some(String::from("busy")));
        let mut tasks = TaskLog::default();
        assert_eq!(
            dispatcher.on_visible(t, &registry, &mut tasks, &mut Tracer::none()),
            0
        );
        assert!(tasks.timeouts.is_empty());
    }

    #[test]
    fn unknown_trigger_dispatches_nothing() {
        let registry = ElementRegistry::default();
        let mut dispatcher = Dispatcher::new(None);
        let mut tasks = TaskLog::default();
        assert_eq!(
            dispatcher.on_visible(ElementId(4), &registry, &mut tasks, &mut Tracer::none()),
            0
        );
    }

    #[test]
    fn flip_without_tracking_takes_two_frames() {
        let el = ElementId(1);
        let mut dispatcher = Dispatcher::new(None);
        let mut dom = MutationLog::default();
        let mut tasks = TaskLog::default();

        dispatcher.run_flip(flip(el, "in"), &mut dom, &mut tasks, &mut Tracer::none());
        assert!(dom.ops.is_empty());
        assert!(matches!(tasks.frames[0], Task::Mark(_)));

        let mark = tasks.frames.remove(0);
        dispatcher.run_flip(mark, &mut dom, &mut tasks, &mut Tracer::none());
        assert!(dom.ops.is_empty(), "no marker configured");

        let apply = tasks.frames.remove(0);
        dispatcher.run_flip(apply, &mut dom, &mut tasks, &mut Tracer::none());
        assert!(dom.has_class(el, "in"));
        assert!(tasks.frames.is_empty());
    }

    #[test]
    fn marker_lands_a_frame_before_the_visible_class() {
        let el = ElementId(1);
        let mut dispatcher = Dispatcher::new(Some(String::from("busy")));
        let mut dom = MutationLog::default();
        let mut tasks = TaskLog::default();
        flip_through(&mut dispatcher, flip(el, "in"), &mut dom, &mut tasks);

        let classes: Vec<_> = dom
            .ops
            .iter()
            .filter(|(_, op, _)| *op == "add")
            .map(|(_, _, class)| class.as_str())
            .collect();
        assert_eq!(classes, ["busy", "in"]);
        assert!(dom.listening(el));
        assert_eq!(dispatcher.active_trackers(), 1);
    }

    #[test]
    fn tracker_is_dropped_after_last_transition() {
        use TransitionSignal::{End, Start};

        let el = ElementId(1);
        let mut dispatcher = Dispatcher::new(Some(String::from("busy")));
        let mut dom = MutationLog::default();
        let mut tasks = TaskLog::default();
        flip_through(&mut dispatcher, flip(el, "in"), &mut dom, &mut tasks);

        let mut tracer = Tracer::none();
        let mut ended = Vec::new();
        for signal in [Start, Start, End, Start, End, End] {
            ended.push(dispatcher.transition_signal(el, signal, &mut dom, &tasks, &mut tracer));
        }
        assert_eq!(ended, [false, false, false, false, false, true]);
        assert!(!dom.has_class(el, "busy"));
        assert!(dom.has_class(el, "in"));
        assert!(dispatcher.tracker(el).is_none());

        // Late signals have nowhere to go.
        assert!(!dispatcher.transition_signal(el, End, &mut dom, &tasks, &mut tracer));
    }

    #[test]
    fn releasing_detaches_only_active_trackers() {
        use TransitionSignal::{End, Start};

        let (a, b) = (ElementId(1), ElementId(2));
        let mut dispatcher = Dispatcher::new(Some(String::from("busy")));
        let mut dom = MutationLog::default();
        let mut tasks = TaskLog::default();
        flip_through(&mut dispatcher, flip(a, "in"), &mut dom, &mut tasks);
        flip_through(&mut dispatcher, flip(b, "in"), &mut dom, &mut tasks);

        let mut tracer = Tracer::none();
        dispatcher.transition_signal(a, Start, &mut dom, &tasks, &mut tracer);
        dispatcher.transition_signal(a, End, &mut dom, &tasks, &mut tracer);
        assert_eq!(dispatcher.tracked_elements().collect::<Vec<_>>(), [b]);

        assert_eq!(dispatcher.release_listeners(&mut dom), 1);
        assert!(!dom.listening(b));
        assert!(dom.has_class(b, "busy"), "marker is left in place");
        assert_eq!(dispatcher.active_trackers(), 0);
        assert!(!dispatcher.transition_signal(b, End, &mut dom, &tasks, &mut tracer));
    }

    #[test]
    fn empty_transitioning_class_disables_tracking() {
        let dispatcher = Dispatcher::new(Some(String::new()));
        assert_eq!(dispatcher.transitioning_class(), None);
    }
}

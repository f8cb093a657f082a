// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The reveal engine: registry, watcher and dispatcher wired together.
//!
//! [`Engine`] holds no host objects. Every entry point borrows the
//! capabilities it needs for the duration of the call, so a host can keep its
//! document, observer and scheduler wherever its event loop wants them.
//!
//! A host drives the engine with four calls:
//!
//! | Host event                         | Engine call                          |
//! |------------------------------------|--------------------------------------|
//! | author adds a container            | [`Engine::register`]                 |
//! | observer delivers a batch          | [`Engine::handle_intersections`]     |
//! | a timer or animation frame fires   | [`Engine::run_task`]                 |
//! | `transitionstart`/`end`/`cancel`   | [`Engine::transition_signal`]        |

use alloc::string::String;

use crate::attributes::AttributeNames;
use crate::dispatch::Dispatcher;
use crate::element::ElementId;
use crate::host::{DocumentQuery, ElementMutator, TaskScheduler, VisibilityObserver};
use crate::registry::ElementRegistry;
use crate::task::Task;
use crate::trace::Tracer;
use crate::transition::TransitionSignal;
use crate::watcher::{IntersectionEntry, VisibilityWatcher};

/// Construction-time engine configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealConfig {
    /// Attribute names scanned during registration.
    pub attributes: AttributeNames,
    /// Marker class applied while a revealed element transitions. `None`
    /// disables transition tracking.
    pub transitioning_class: Option<String>,
}

impl RevealConfig {
    /// Enables transition tracking with `class` as the marker.
    #[must_use]
    pub fn with_transitioning_class(mut self, class: impl Into<String>) -> Self {
        self.transitioning_class = Some(class.into());
        self
    }

    /// Replaces the scanned attribute names.
    #[must_use]
    pub fn with_attributes(mut self, attributes: AttributeNames) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Visibility-driven trigger/receiver dispatch engine.
#[derive(Debug)]
pub struct Engine {
    registry: ElementRegistry,
    watcher: VisibilityWatcher,
    dispatcher: Dispatcher,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(RevealConfig::default())
    }
}

impl Engine {
    /// Creates an engine.
    #[must_use]
    pub fn new(config: RevealConfig) -> Self {
        Self {
            registry: ElementRegistry::new(config.attributes),
            watcher: VisibilityWatcher::new(),
            dispatcher: Dispatcher::new(config.transitioning_class),
        }
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    /// Returns the visibility watcher.
    #[must_use]
    pub fn watcher(&self) -> &VisibilityWatcher {
        &self.watcher
    }

    /// Returns the dispatcher.
    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Registers the triggers and receivers below `container` and starts
    /// observing every new trigger.
    ///
    /// Returns the number of new triggers.
    pub fn register<D, O>(
        &mut self,
        container: ElementId,
        doc: &D,
        observer: &mut O,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        D: DocumentQuery + ?Sized,
        O: VisibilityObserver + ?Sized,
    {
        let watcher = &mut self.watcher;
        self.registry.register(
            container,
            doc,
            &mut |trigger: ElementId| {
                watcher.watch(trigger, observer);
            },
            tracer,
        )
    }

    /// Processes one batch of intersection entries. Returns the number of
    /// triggers that qualified as visible.
    pub fn handle_intersections<O, S>(
        &mut self,
        entries: &[IntersectionEntry],
        observer: &mut O,
        scheduler: &mut S,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        O: VisibilityObserver + ?Sized,
        S: TaskScheduler + ?Sized,
    {
        self.watcher
            .handle_batch(entries, &self.registry, observer, scheduler, tracer)
    }

    /// Runs a task the host scheduled on the engine's behalf.
    pub fn run_task<M, S>(
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
            Task::Visible(trigger) => {
                self.dispatcher
                    .on_visible(trigger, &self.registry, scheduler, tracer);
            }
            flip => self.dispatcher.run_flip(flip, dom, scheduler, tracer),
        }
    }

    /// Forwards a transition signal for `element`. Returns `true` if it
    /// ended the element's last running transition.
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
        self.dispatcher
            .transition_signal(element, signal, dom, scheduler, tracer)
    }

    /// Detaches the transition listeners of every element still
    /// transitioning. Hosts call this before tearing down their listener.
    pub fn release_listeners<M: ElementMutator + ?Sized>(&mut self, dom: &mut M) -> usize {
        self.dispatcher.release_listeners(dom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::tests::FlatDoc;
    use crate::time::Millis;
    use crate::transition::tests::MutationLog;
    use crate::watcher::tests::{ObserverLog, TaskLog};
    use alloc::vec::Vec;

    /// Runs every queued timeout, then frames until both queues drain.
    /// Delays are ignored; ordering is by queue position.
    fn drain(engine: &mut Engine, dom: &mut MutationLog, tasks: &mut TaskLog) {
        let mut tracer = Tracer::none();
        loop {
            if !tasks.timeouts.is_empty() {
                let (_, task) = tasks.timeouts.remove(0);
                engine.run_task(task, dom, tasks, &mut tracer);
            } else if !tasks.frames.is_empty() {
                let frame: Vec<_> = tasks.frames.drain(..).collect();
                for task in frame {
                    engine.run_task(task, dom, tasks, &mut tracer);
                }
            } else {
                break;
            }
        }
    }

    #[test]
    fn register_observes_each_trigger_once() {
        let mut doc = FlatDoc::new();
        let a = doc.push(&[("data-visible-class", "a"), ("data-element-name", "n")]);
        let b = doc.push(&[("data-element-name", "m")]);
        let mut engine = Engine::default();
        let mut observer = ObserverLog::default();

        let added = engine.register(ElementId(0), &doc, &mut observer, &mut Tracer::none());
        assert_eq!(added, 2);
        assert_eq!(observer.observed, [a, b]);

        engine.register(ElementId(0), &doc, &mut observer, &mut Tracer::none());
        assert_eq!(observer.observed, [a, b]);
        assert_eq!(engine.watcher().watched_count(), 2);
    }

    #[test]
    fn named_trigger_reveals_foreign_receivers() {
        let mut doc = FlatDoc::new();
        let hero = doc.push(&[("data-element-name", "hero")]);
        let caption = doc.push(&[
            ("data-visible-class", "shown"),
            ("data-foreign-trigger", "hero"),
        ]);
        let config = RevealConfig::default().with_transitioning_class("busy");
        let mut engine = Engine::new(config);
        let mut observer = ObserverLog::default();
        let mut dom = MutationLog::default();
        let mut tasks = TaskLog::default();
        let mut tracer = Tracer::none();

        engine.register(ElementId(0), &doc, &mut observer, &mut tracer);
        assert_eq!(observer.observed, [hero], "receivers are not observed");

        let entry = IntersectionEntry::new(hero, true, 1.0, 100.0);
        assert_eq!(
            engine.handle_intersections(&[entry], &mut observer, &mut tasks, &mut tracer),
            1
        );
        assert_eq!(tasks.timeouts, [(Millis(0), Task::Visible(hero))]);

        drain(&mut engine, &mut dom, &mut tasks);
        assert!(dom.has_class(caption, "shown"));
        assert!(dom.has_class(caption, "busy"));
        assert!(!dom.has_class(hero, "shown"));

        engine.transition_signal(caption, TransitionSignal::Start, &mut dom, &tasks, &mut tracer);
        assert!(engine.transition_signal(
            caption,
            TransitionSignal::End,
            &mut dom,
            &tasks,
            &mut tracer
        ));
        assert!(!dom.has_class(caption, "busy"));
    }

    #[test]
    fn custom_attribute_names_are_scanned() {
        let mut doc = FlatDoc::new();
        let el = doc.push(&[("data-reveal-visible-class", "in")]);
        doc.push(&[("data-visible-class", "ignored")]);
        let config =
            RevealConfig::default().with_attributes(AttributeNames::with_prefix("reveal"));
        let mut engine = Engine::new(config);
        let mut observer = ObserverLog::default();

        engine.register(ElementId(0), &doc, &mut observer, &mut Tracer::none());
        assert_eq!(engine.registry().triggers(), &[el]);
    }
}

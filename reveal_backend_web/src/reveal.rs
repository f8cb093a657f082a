// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The browser-facing entry point.

use alloc::boxed::Box;
use alloc::rc::Rc;
use core::cell::RefCell;

use js_sys::Array;
use reveal_core::engine::{Engine, RevealConfig};
use reveal_core::task::Task;
use reveal_core::trace::{TraceSink, Tracer};
use reveal_core::transition::TransitionSignal;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast as _;
use web_sys::{Element, Event, IntersectionObserver};

use crate::dom::{DomHost, attribute_selector};
use crate::error::BackendError;
use crate::observer::{ObserverHandle, convert_entries, create_observer};
use crate::scheduler::WebScheduler;

type IntersectClosure = Closure<dyn FnMut(Array, IntersectionObserver)>;
type EventClosure = Closure<dyn FnMut(Event)>;

struct State {
    engine: Engine,
    dom: DomHost,
    scheduler: WebScheduler,
    observer: Option<IntersectionObserver>,
    sink: Option<Box<dyn TraceSink>>,
}

impl State {
    fn tracer(sink: &mut Option<Box<dyn TraceSink>>) -> Tracer<'_> {
        match sink {
            Some(sink) => Tracer::new(&mut **sink),
            None => Tracer::none(),
        }
    }
}

/// Shared between the [`Reveal`] handle and the JS closures.
pub(crate) struct Inner {
    state: RefCell<State>,
    on_intersect: RefCell<Option<IntersectClosure>>,
    on_transition: RefCell<Option<EventClosure>>,
}

impl core::fmt::Debug for Inner {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Inner").finish_non_exhaustive()
    }
}

impl Inner {
    /// Runs a task handed back by a timer or animation frame.
    pub(crate) fn run_task(&self, task: Task) {
        let mut state = self.state.borrow_mut();
        let State {
            engine,
            dom,
            scheduler,
            sink,
            ..
        } = &mut *state;
        let mut tracer = State::tracer(sink);
        engine.run_task(task, dom, scheduler, &mut tracer);
    }

    fn intersect(&self, entries: &Array) {
        let mut state = self.state.borrow_mut();
        let State {
            engine,
            dom,
            scheduler,
            observer,
            sink,
        } = &mut *state;
        let Some(observer) = observer.as_ref() else {
            return;
        };
        let entries = convert_entries(entries, dom);
        let mut handle = ObserverHandle { observer, dom };
        let mut tracer = State::tracer(sink);
        engine.handle_intersections(&entries, &mut handle, scheduler, &mut tracer);
    }

    fn transition(&self, event: &Event) {
        let signal = match event.type_().as_str() {
            "transitionstart" => TransitionSignal::Start,
            "transitionend" => TransitionSignal::End,
            "transitioncancel" => TransitionSignal::Cancel,
            _ => return,
        };
        let Some(target) = event
            .current_target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        else {
            return;
        };
        let mut state = self.state.borrow_mut();
        let State {
            engine,
            dom,
            scheduler,
            sink,
            ..
        } = &mut *state;
        let Some(element) = dom.lookup(&target) else {
            return;
        };
        let mut tracer = State::tracer(sink);
        engine.transition_signal(element, signal, dom, scheduler, &mut tracer);
    }
}

/// Adds classes to elements as they scroll into view.
///
/// ```ignore
/// let reveal = Reveal::new(RevealConfig::default().with_transitioning_class("is-transitioning"))?;
/// reveal.add_all(".animationContainer")?;
/// ```
///
/// Dropping the `Reveal` disconnects the observer. Pending timers and frames
/// still fire, but find nothing to do.
pub struct Reveal {
    inner: Rc<Inner>,
}

impl core::fmt::Debug for Reveal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.inner.state.borrow();
        f.debug_struct("Reveal")
            .field("triggers", &state.engine.registry().trigger_count())
            .field("elements", &state.dom.len())
            .finish_non_exhaustive()
    }
}

impl Reveal {
    /// Creates a reveal instance for the current window.
    pub fn new(config: RevealConfig) -> Result<Self, BackendError> {
        Self::build(config, None)
    }

    /// Like [`new`](Self::new), reporting engine trace events to `sink`.
    ///
    /// Events are only emitted when `reveal_core` is built with its `trace`
    /// feature.
    pub fn with_sink(config: RevealConfig, sink: Box<dyn TraceSink>) -> Result<Self, BackendError> {
        Self::build(config, Some(sink))
    }

    fn build(config: RevealConfig, sink: Option<Box<dyn TraceSink>>) -> Result<Self, BackendError> {
        web_sys::window().ok_or(BackendError::NoWindow)?;

        let inner = Rc::new_cyclic(|weak| Inner {
            state: RefCell::new(State {
                engine: Engine::new(config),
                dom: DomHost::new(),
                scheduler: WebScheduler::new(weak.clone()),
                observer: None,
                sink,
            }),
            on_intersect: RefCell::new(None),
            on_transition: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let on_intersect: IntersectClosure = Closure::wrap(Box::new(
            move |entries: Array, _observer: IntersectionObserver| {
                if let Some(inner) = weak.upgrade() {
                    inner.intersect(&entries);
                }
            },
        ) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let weak = Rc::downgrade(&inner);
        let on_transition: EventClosure = Closure::wrap(Box::new(move |event: Event| {
            if let Some(inner) = weak.upgrade() {
                inner.transition(&event);
            }
        }) as Box<dyn FnMut(Event)>);

        let observer = create_observer(on_intersect.as_ref().unchecked_ref())?;
        {
            let mut state = inner.state.borrow_mut();
            state.observer = Some(observer);
            state
                .dom
                .set_transition_handler(on_transition.as_ref().unchecked_ref::<js_sys::Function>().clone());
        }
        *inner.on_intersect.borrow_mut() = Some(on_intersect);
        *inner.on_transition.borrow_mut() = Some(on_transition);

        Ok(Self { inner })
    }

    /// Registers the reveal elements inside `container` and starts observing
    /// its triggers. Returns the number of new triggers.
    pub fn add(&self, container: &Element) -> usize {
        let mut state = self.inner.state.borrow_mut();
        let State {
            engine,
            dom,
            observer,
            sink,
            ..
        } = &mut *state;
        let Some(observer) = observer.as_ref() else {
            return 0;
        };
        let container = dom.intern(container);
        let mut handle = ObserverHandle { observer, dom };
        let mut tracer = State::tracer(sink);
        engine.register(container, &*dom, &mut handle, &mut tracer)
    }

    /// Registers every container matching `selector` in the document.
    pub fn add_all(&self, selector: &str) -> Result<usize, BackendError> {
        let document = web_sys::window()
            .ok_or(BackendError::NoWindow)?
            .document()
            .ok_or(BackendError::NoDocument)?;
        let list = document
            .query_selector_all(selector)
            .map_err(|_| BackendError::InvalidSelector)?;
        let added = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|container| self.add(&container))
            .sum();
        Ok(added)
    }

    /// Returns `true` if any element inside `container` carries the visible
    /// class attribute this instance scans for.
    #[must_use]
    pub fn has_reveal_elements(&self, container: &Element) -> bool {
        let state = self.inner.state.borrow();
        let attribute = &state.engine.registry().attributes().visible_class;
        matches!(
            container.query_selector(&attribute_selector(attribute)),
            Ok(Some(_))
        )
    }

    /// Returns and clears the first timer or frame failure since the last
    /// call. Scheduling failures cannot be reported synchronously because
    /// they happen inside engine callbacks.
    pub fn take_error(&self) -> Option<BackendError> {
        self.inner.state.borrow().scheduler.take_error()
    }
}

impl Drop for Reveal {
    fn drop(&mut self) {
        {
            let mut state = self.inner.state.borrow_mut();
            if let Some(observer) = state.observer.take() {
                observer.disconnect();
            }
            let State { engine, dom, .. } = &mut *state;
            engine.release_listeners(dom);
        }
        // Drop the JS closures so they don't leak.
        self.inner.on_intersect.borrow_mut().take();
        self.inner.on_transition.borrow_mut().take();
    }
}

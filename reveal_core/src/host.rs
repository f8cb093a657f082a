// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host contract for platform integrations.
//!
//! The engine consumes four capabilities. A host crate implements them over
//! its native element tree:
//!
//! - **[`DocumentQuery`]**: finds descendants carrying an attribute and reads
//!   attribute values. Used once per container, during registration.
//!
//! - **[`VisibilityObserver`]**: starts and stops visibility observation of a
//!   single element. Observation results come back to the engine as batches
//!   of [`IntersectionEntry`] values, pushed by the host through
//!   [`Engine::handle_intersections`].
//!
//! - **[`TaskScheduler`]**: runs a [`Task`] after a delay or before the next
//!   paint, by calling [`Engine::run_task`] with it. Also reads the host clock
//!   for diagnostics.
//!
//! - **[`ElementMutator`]**: adds and removes classes, and attaches or detaches
//!   the transition listeners whose signals reach the engine through
//!   [`Engine::transition_signal`].
//!
//! # Crate boundaries
//!
//! `reveal_core` owns the registry, the visibility policy, dispatch and
//! transition tracking. Host crates (`reveal_backend_web` for browsers,
//! `reveal_harness` for tests) own element storage and the event loop.
//!
//! [`IntersectionEntry`]: crate::watcher::IntersectionEntry
//! [`Engine::handle_intersections`]: crate::engine::Engine::handle_intersections
//! [`Engine::run_task`]: crate::engine::Engine::run_task
//! [`Engine::transition_signal`]: crate::engine::Engine::transition_signal

use alloc::string::String;
use alloc::vec::Vec;

use crate::element::ElementId;
use crate::task::Task;
use crate::time::{HostTime, Millis};

/// Read access to the host document.
pub trait DocumentQuery {
    /// Returns the descendants of `container` that carry `attribute`, in
    /// document order. The container itself is not included.
    fn descendants_with_attribute(&self, container: ElementId, attribute: &str)
    -> Vec<ElementId>;

    /// Returns the value of `name` on `element`, or `None` if the attribute
    /// is not present.
    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    /// Returns `true` if `element` carries `name`.
    fn has_attribute(&self, element: ElementId, name: &str) -> bool {
        self.attribute(element, name).is_some()
    }
}

/// Write access to host elements.
pub trait ElementMutator {
    /// Adds `class` to the element's class list.
    fn add_class(&mut self, element: ElementId, class: &str);

    /// Removes `class` from the element's class list.
    fn remove_class(&mut self, element: ElementId, class: &str);

    /// Starts forwarding `transitionstart`, `transitionend` and
    /// `transitioncancel` for `element` to the engine.
    fn listen_transitions(&mut self, element: ElementId);

    /// Stops forwarding transition signals for `element`.
    fn unlisten_transitions(&mut self, element: ElementId);
}

/// Visibility observation of individual elements.
pub trait VisibilityObserver {
    /// Starts reporting visibility changes for `element`.
    fn observe(&mut self, element: ElementId);

    /// Stops reporting visibility changes for `element`.
    fn unobserve(&mut self, element: ElementId);
}

/// Timers, animation frames and the host clock.
pub trait TaskScheduler {
    /// Returns the current host time.
    fn now(&self) -> HostTime;

    /// Runs `task` once `delay` has elapsed.
    fn set_timeout(&mut self, delay: Millis, task: Task);

    /// Runs `task` before the next paint.
    ///
    /// A frame task requested while a frame is running runs in the following
    /// frame.
    fn request_frame(&mut self, task: Task);
}

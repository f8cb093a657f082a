// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deferred work items.
//!
//! The engine never holds closures. Everything it wants to happen later is a
//! [`Task`] handed to the host's [`TaskScheduler`], and the host hands the
//! same value back through [`Engine::run_task`] when the timer or animation
//! frame fires.
//!
//! A receiver reveal walks through three tasks:
//!
//! ```text
//!   set_timeout(delay) ──► Reveal ──► request_frame ──► Mark
//!                                                         │
//!                          Apply ◄── request_frame ◄──────┘
//! ```
//!
//! [`TaskScheduler`]: crate::host::TaskScheduler
//! [`Engine::run_task`]: crate::engine::Engine::run_task

use alloc::string::String;

use crate::element::ElementId;

/// A class to add to a receiver element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassFlip {
    /// The receiver element.
    pub element: ElementId,
    /// The receiver's visible class.
    pub visible_class: String,
}

/// A unit of deferred engine work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Task {
    /// A trigger's cumulative stagger elapsed: emit its "visible" event.
    Visible(ElementId),
    /// A receiver's delay elapsed: start the frame sequence.
    Reveal(ClassFlip),
    /// First frame: apply the transitioning marker, if enabled.
    Mark(ClassFlip),
    /// Second frame: apply the visible class.
    Apply(ClassFlip),
}

impl Task {
    /// Returns the element this task acts on.
    #[must_use]
    pub fn element(&self) -> ElementId {
        match self {
            Self::Visible(element) => *element,
            Self::Reveal(flip) | Self::Mark(flip) | Self::Apply(flip) => flip.element,
        }
    }
}

// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility-driven trigger/receiver dispatch for scroll-reveal animations.
//!
//! `reveal_core` decides *when* to add a class to an element as it scrolls
//! into view. It never touches a real document: hosts hand it
//! [`ElementId`](element::ElementId) handles and implement the capability
//! traits in [`host`]. The crate is `no_std` compatible (with `alloc`).
//!
//! # Architecture
//!
//! ```text
//!   Engine::register(container)
//!       │
//!       ▼
//!   ElementRegistry ──► TriggerListener ──► VisibilityWatcher::watch()
//!                                                  │
//!                        IntersectionEntry batch ──┘
//!                                  │
//!                                  ▼
//!   VisibilityWatcher::handle_batch() ──► Task::Visible (after stagger)
//!                                                  │
//!                 ┌────────────────────────────────┘
//!                 ▼
//!   Dispatcher::on_visible() ──► Task::Reveal (after receiver delay)
//!                                                  │
//!                 ┌────────────────────────────────┘
//!                 ▼
//!   frame: Mark (TransitionTracker::begin) ──► frame: Apply (visible class)
//! ```
//!
//! **[`registry`]**: scans a container once for triggers and receivers.
//!
//! **[`watcher`]**: adaptive visibility thresholds and per-batch stagger.
//!
//! **[`dispatch`]**: schedules receiver class flips over two frames.
//!
//! **[`transition`]**: keeps a marker class on an element until every
//! transition it started has ended.
//!
//! **[`engine`]**: the three above composed behind four host-facing calls.
//!
//! **[`host`]**: the capability traits hosts implement.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types, with
//! the zero-overhead [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod attributes;
pub mod dispatch;
pub mod element;
pub mod engine;
pub mod host;
pub mod registry;
pub mod task;
pub mod time;
pub mod trace;
pub mod transition;
pub mod watcher;

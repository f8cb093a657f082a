// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Deterministic in-memory hosts for the reveal engine.
//!
//! - [`document::FakeDocument`]: an element tree with attributes, class
//!   lists, heights and a mutation log.
//! - [`scheduler::VirtualScheduler`]: a millisecond clock with a FIFO timer
//!   queue and a frame queue.
//! - [`observer::RecordingObserver`]: tracks which elements are observed.
//! - [`harness::Harness`]: all three wired to an
//!   [`Engine`](reveal_core::engine::Engine).

#![no_std]

extern crate alloc;

pub mod document;
pub mod harness;
pub mod observer;
pub mod scheduler;

pub use harness::Harness;

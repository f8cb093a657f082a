// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Web backend for reveal.
//!
//! This crate connects [`reveal_core`] to browser APIs:
//!
//! - [`Reveal`]: the entry point. Scans containers, owns the
//!   `IntersectionObserver` and forwards transition events.
//! - [`DomHost`]: maps engine handles to DOM elements.
//! - [`now`]: host time from `performance.now()`, in microseconds.

#![no_std]

extern crate alloc;

mod dom;
mod error;
mod observer;
mod reveal;
mod scheduler;

pub use dom::DomHost;
pub use error::BackendError;
pub use reveal::Reveal;
pub use reveal_core::engine::RevealConfig;
pub use scheduler::now;

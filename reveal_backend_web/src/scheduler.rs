// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `setTimeout` / `requestAnimationFrame` task scheduling.
//!
//! Every scheduled [`Task`] becomes a one-shot JS closure that hands the task
//! back to the owning [`Reveal`](crate::Reveal). The closures free themselves
//! after running, and hold only a weak reference, so tasks still pending when
//! the `Reveal` is dropped do nothing.

use alloc::rc::Weak;
use core::cell::Cell;

use reveal_core::host::TaskScheduler;
use reveal_core::task::Task;
use reveal_core::time::{HostTime, Millis};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;

use crate::error::BackendError;
use crate::reveal::Inner;

// Direct global bindings instead of `web_sys::Window` methods, so scheduling
// does not need to fetch the window each time.
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = performance, js_name = "now")]
    fn performance_now() -> f64;

    #[wasm_bindgen(catch, js_name = "setTimeout")]
    fn set_timeout_js(callback: &JsValue, delay_ms: i32) -> Result<i32, JsValue>;

    #[wasm_bindgen(catch, js_name = "requestAnimationFrame")]
    fn request_animation_frame(callback: &JsValue) -> Result<i32, JsValue>;
}

/// Returns the current host time from `performance.now()`.
#[must_use]
pub fn now() -> HostTime {
    millis_to_host_time(performance_now())
}

pub(crate) fn millis_to_host_time(ms: f64) -> HostTime {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "performance.now() returns small positive f64; µs fits in u64"
    )]
    let us = (ms * 1000.0) as u64;
    HostTime(us)
}

/// Clamps a delay to the range `setTimeout` accepts.
pub(crate) fn timeout_arg(delay: Millis) -> i32 {
    i32::try_from(delay.get()).unwrap_or(i32::MAX)
}

/// A [`TaskScheduler`] backed by browser timers and animation frames.
#[derive(Debug)]
pub(crate) struct WebScheduler {
    owner: Weak<Inner>,
    error: Cell<Option<BackendError>>,
}

impl WebScheduler {
    pub(crate) fn new(owner: Weak<Inner>) -> Self {
        Self {
            owner,
            error: Cell::new(None),
        }
    }

    /// Returns and clears the first scheduling failure since the last call.
    pub(crate) fn take_error(&self) -> Option<BackendError> {
        self.error.take()
    }

    fn record(&self, error: BackendError) {
        if self.error.get().is_none() {
            self.error.set(Some(error));
        }
    }

    fn callback(&self, task: Task) -> JsValue {
        let owner = Weak::clone(&self.owner);
        Closure::once_into_js(move || {
            if let Some(inner) = owner.upgrade() {
                inner.run_task(task);
            }
        })
    }
}

impl TaskScheduler for WebScheduler {
    fn now(&self) -> HostTime {
        now()
    }

    fn set_timeout(&mut self, delay: Millis, task: Task) {
        let callback = self.callback(task);
        if set_timeout_js(&callback, timeout_arg(delay)).is_err() {
            self.record(BackendError::TimeoutFailed);
        }
    }

    fn request_frame(&mut self, task: Task) {
        let callback = self.callback(task);
        if request_animation_frame(&callback).is_err() {
            self.record(BackendError::FrameFailed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_time_is_microseconds() {
        assert_eq!(millis_to_host_time(16.5), HostTime(16_500));
        assert_eq!(millis_to_host_time(0.0), HostTime(0));
    }

    #[test]
    fn long_delays_are_clamped() {
        assert_eq!(timeout_arg(Millis(250)), 250);
        assert_eq!(timeout_arg(Millis(u32::MAX)), i32::MAX);
    }
}

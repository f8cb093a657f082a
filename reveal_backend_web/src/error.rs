// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Backend errors.

use core::fmt;

/// Errors from browser API calls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendError {
    /// There is no global `window` (e.g. running in a worker).
    NoWindow,
    /// The window has no `document`.
    NoDocument,
    /// `new IntersectionObserver(..)` threw.
    ObserverFailed,
    /// `querySelectorAll` rejected a selector.
    InvalidSelector,
    /// `setTimeout` threw.
    TimeoutFailed,
    /// `requestAnimationFrame` threw.
    FrameFailed,
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoWindow => f.write_str("no global window"),
            Self::NoDocument => f.write_str("window has no document"),
            Self::ObserverFailed => f.write_str("IntersectionObserver construction failed"),
            Self::InvalidSelector => f.write_str("invalid selector"),
            Self::TimeoutFailed => f.write_str("setTimeout failed"),
            Self::FrameFailed => f.write_str("requestAnimationFrame failed"),
        }
    }
}

impl core::error::Error for BackendError {}

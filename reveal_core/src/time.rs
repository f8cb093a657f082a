// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host timestamps and millisecond delays.
//!
//! [`HostTime`] is a monotonic point in time in microseconds, as read from the
//! host clock (`performance.now()` on the web, a virtual clock in tests). It
//! only appears in diagnostics.
//!
//! [`Millis`] is the unit every scheduling decision is made in: trigger
//! staggers, receiver delays, and the cumulative stagger of a visibility
//! batch. Accumulation saturates instead of wrapping.

use core::fmt;
use core::ops::Add;

/// A point in time in microseconds since an arbitrary host origin.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Returns the raw microsecond value.
    #[inline]
    #[must_use]
    pub const fn micros(self) -> u64 {
        self.0
    }

    /// Creates a host time from a whole number of milliseconds.
    #[inline]
    #[must_use]
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1000))
    }

    /// Returns the time after `delay` has elapsed, saturating at the end of
    /// the representable range.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, delay: Millis) -> Self {
        Self(self.0.saturating_add(delay.0 as u64 * 1000))
    }
}

impl fmt::Debug for HostTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostTime({}µs)", self.0)
    }
}

/// A non-negative delay in whole milliseconds.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Millis(pub u32);

impl Millis {
    /// No delay.
    pub const ZERO: Self = Self(0);

    /// Returns the raw millisecond value.
    #[inline]
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Add for Millis {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl fmt::Debug for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

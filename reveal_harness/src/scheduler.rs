// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual clock, timer queue and frame queue.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;

use reveal_core::host::TaskScheduler;
use reveal_core::task::Task;
use reveal_core::time::{HostTime, Millis};

/// Milliseconds between two virtual animation frames.
pub const FRAME_INTERVAL_MS: u64 = 16;

/// A [`TaskScheduler`] on a virtual millisecond clock.
///
/// Timers are ordered by deadline, then by the order they were set, so timers
/// sharing a deadline fire first-in first-out. Frame tasks queue up until the
/// owner takes the whole frame with [`take_frame`](Self::take_frame).
#[derive(Clone, Debug, Default)]
pub struct VirtualScheduler {
    now_ms: u64,
    seq: u64,
    timers: BTreeMap<(u64, u64), Task>,
    frame: Vec<Task>,
}

impl VirtualScheduler {
    /// Creates a scheduler at time zero with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Returns the number of pending timers.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Returns the number of tasks waiting for the next frame.
    #[must_use]
    pub fn pending_frame_tasks(&self) -> usize {
        self.frame.len()
    }

    /// Returns the deadline of the earliest pending timer.
    #[must_use]
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.keys().next().map(|&(deadline, _)| deadline)
    }

    /// Removes the earliest timer due at or before `until`, moving the clock
    /// forward to its deadline.
    pub fn pop_due(&mut self, until: u64) -> Option<Task> {
        let (&(deadline, seq), _) = self.timers.first_key_value()?;
        if deadline > until {
            return None;
        }
        self.now_ms = self.now_ms.max(deadline);
        self.timers.remove(&(deadline, seq))
    }

    /// Moves the clock forward to `ms`. Never moves it backwards.
    pub fn set_now(&mut self, ms: u64) {
        self.now_ms = self.now_ms.max(ms);
    }

    /// Takes every task requested for the next frame. Tasks requested while
    /// the returned frame runs go to the frame after.
    pub fn take_frame(&mut self) -> Vec<Task> {
        core::mem::take(&mut self.frame)
    }
}

impl TaskScheduler for VirtualScheduler {
    fn now(&self) -> HostTime {
        HostTime::from_millis(self.now_ms)
    }

    fn set_timeout(&mut self, delay: Millis, task: Task) {
        let deadline = self.now_ms.saturating_add(u64::from(delay.get()));
        self.timers.insert((deadline, self.seq), task);
        self.seq += 1;
    }

    fn request_frame(&mut self, task: Task) {
        self.frame.push(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reveal_core::element::ElementId;

    #[test]
    fn equal_deadlines_fire_in_insertion_order() {
        let mut s = VirtualScheduler::new();
        s.set_timeout(Millis(50), Task::Visible(ElementId(1)));
        s.set_timeout(Millis(10), Task::Visible(ElementId(2)));
        s.set_timeout(Millis(50), Task::Visible(ElementId(3)));

        let mut fired = Vec::new();
        while let Some(task) = s.pop_due(100) {
            fired.push((s.now_ms(), task.element()));
        }
        assert_eq!(
            fired,
            [(10, ElementId(2)), (50, ElementId(1)), (50, ElementId(3))]
        );
    }

    #[test]
    fn timers_past_the_horizon_stay_queued() {
        let mut s = VirtualScheduler::new();
        s.set_timeout(Millis(30), Task::Visible(ElementId(1)));
        assert!(s.pop_due(29).is_none());
        assert_eq!(s.next_deadline(), Some(30));
        assert_eq!(s.now_ms(), 0);
        assert!(s.pop_due(30).is_some());
        assert_eq!(s.now(), HostTime::from_millis(30));
    }

    #[test]
    fn frame_requests_during_a_frame_wait_for_the_next() {
        let mut s = VirtualScheduler::new();
        s.request_frame(Task::Visible(ElementId(1)));
        let frame = s.take_frame();
        assert_eq!(frame.len(), 1);
        s.request_frame(Task::Visible(ElementId(2)));
        assert_eq!(s.pending_frame_tasks(), 1);
    }
}

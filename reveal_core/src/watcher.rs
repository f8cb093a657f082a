// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Visibility policy: which triggers just became visible, and when to say so.
//!
//! The [`VisibilityWatcher`] observes every registered trigger. For each
//! batch of [`IntersectionEntry`] values it:
//!
//! 1. skips entries that are not intersecting, or whose element is no longer
//!    watched;
//! 2. compares the visible fraction against a threshold derived from the
//!    element's height (see [`threshold_for_height`]);
//! 3. adds the trigger's stagger to the batch's running delay and schedules a
//!    [`Task::Visible`] after that delay;
//! 4. stops watching the element.
//!
//! Staggers compound within a batch: the n-th qualifying trigger waits for the
//! sum of the first n staggers. Each batch starts again from zero. Elements
//! that fall below their threshold stay watched and can qualify later.

use alloc::collections::BTreeSet;

use kurbo::Rect;

use crate::element::ElementId;
use crate::host::{TaskScheduler, VisibilityObserver};
use crate::registry::ElementRegistry;
use crate::task::Task;
use crate::time::Millis;
use crate::trace::{BatchEvent, Tracer, VisibleScheduledEvent};

/// Visible-fraction thresholds the host observer must report at.
///
/// These are exactly the values [`threshold_for_height`] can return, so an
/// entry is delivered whenever an element crosses its own threshold.
pub const OBSERVER_THRESHOLDS: [f64; 4] = [0.01, 0.05, 0.1, 0.2];

/// One visibility observation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntersectionEntry {
    /// The observed element.
    pub element: ElementId,
    /// Whether any part of the element intersects the viewport.
    pub is_intersecting: bool,
    /// Visible fraction of the element, `0.0..=1.0`.
    pub visible_fraction: f64,
    /// The element's bounding box in viewport coordinates.
    pub bounds: Rect,
}

impl IntersectionEntry {
    /// Creates an entry for an element of the given height at the viewport
    /// origin.
    #[must_use]
    pub fn new(
        element: ElementId,
        is_intersecting: bool,
        visible_fraction: f64,
        height: f64,
    ) -> Self {
        Self {
            element,
            is_intersecting,
            visible_fraction,
            bounds: Rect::new(0.0, 0.0, 0.0, height),
        }
    }

    /// Returns the height of the element's bounding box.
    #[must_use]
    pub fn bounding_height(&self) -> f64 {
        self.bounds.height()
    }
}

/// Returns the visible fraction an element of `height` must reach to count
/// as visible.
///
/// Tall elements get a smaller threshold: a fixed fraction of a very tall
/// element may take several screens of scrolling to appear, or never fit in
/// the viewport at all.
#[must_use]
pub fn threshold_for_height(height: f64) -> f64 {
    if height > 5000.0 {
        0.01
    } else if height > 2000.0 {
        0.05
    } else if height > 1000.0 {
        0.1
    } else {
        0.2
    }
}

/// Watches triggers and decides when they count as visible.
#[derive(Clone, Debug, Default)]
pub struct VisibilityWatcher {
    watched: BTreeSet<ElementId>,
}

impl VisibilityWatcher {
    /// Creates a watcher with nothing watched.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts observing `element`.
    ///
    /// Returns `false`, without calling the observer, if the element is
    /// already watched.
    pub fn watch<O: VisibilityObserver + ?Sized>(
        &mut self,
        element: ElementId,
        observer: &mut O,
    ) -> bool {
        if !self.watched.insert(element) {
            return false;
        }
        observer.observe(element);
        true
    }

    /// Returns `true` if `element` is currently observed.
    #[must_use]
    pub fn is_watching(&self, element: ElementId) -> bool {
        self.watched.contains(&element)
    }

    /// Returns the number of observed elements.
    #[must_use]
    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }

    /// Processes one batch of intersection entries.
    ///
    /// Returns the number of triggers that qualified.
    pub fn handle_batch<O, S>(
        &mut self,
        entries: &[IntersectionEntry],
        registry: &ElementRegistry,
        observer: &mut O,
        scheduler: &mut S,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        O: VisibilityObserver + ?Sized,
        S: TaskScheduler + ?Sized,
    {
        let at = scheduler.now();
        let mut cumulative = Millis::ZERO;
        let mut qualified: u32 = 0;

        for entry in entries {
            if !entry.is_intersecting || !self.is_watching(entry.element) {
                continue;
            }
            if entry.visible_fraction < threshold_for_height(entry.bounding_height()) {
                continue;
            }

            let stagger = registry
                .options_for(entry.element)
                .map_or(Millis::ZERO, |options| options.stagger);
            cumulative = cumulative + stagger;

            tracer.visible_scheduled(&VisibleScheduledEvent {
                at,
                trigger: entry.element,
                delay: cumulative,
            });
            scheduler.set_timeout(cumulative, Task::Visible(entry.element));

            self.watched.remove(&entry.element);
            observer.unobserve(entry.element);
            qualified += 1;
        }

        tracer.batch(&BatchEvent {
            at,
            entries: u32::try_from(entries.len()).unwrap_or(u32::MAX),
            qualified,
            cumulative,
        });
        qualified as usize
    }
}

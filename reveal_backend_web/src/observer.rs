// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `IntersectionObserver` integration.

use alloc::vec::Vec;

use js_sys::{Array, Function};
use kurbo::Rect;
use reveal_core::element::ElementId;
use reveal_core::host::VisibilityObserver;
use reveal_core::watcher::{IntersectionEntry, OBSERVER_THRESHOLDS};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom::DomHost;
use crate::error::BackendError;

/// Creates an observer that reports at every adaptive threshold.
pub(crate) fn create_observer(callback: &Function) -> Result<IntersectionObserver, BackendError> {
    let thresholds: Array = OBSERVER_THRESHOLDS.iter().copied().map(JsValue::from).collect();
    let init = IntersectionObserverInit::new();
    init.set_threshold(&thresholds);
    IntersectionObserver::new_with_options(callback, &init)
        .map_err(|_| BackendError::ObserverFailed)
}

/// Converts raw observer entries into engine entries, skipping targets the
/// arena does not know.
pub(crate) fn convert_entries(entries: &Array, dom: &DomHost) -> Vec<IntersectionEntry> {
    entries
        .iter()
        .filter_map(|value| value.dyn_into::<IntersectionObserverEntry>().ok())
        .filter_map(|entry| {
            let element = dom.lookup(&entry.target())?;
            let rect = entry.bounding_client_rect();
            Some(IntersectionEntry {
                element,
                is_intersecting: entry.is_intersecting(),
                visible_fraction: entry.intersection_ratio(),
                bounds: Rect::new(
                    rect.x(),
                    rect.y(),
                    rect.x() + rect.width(),
                    rect.y() + rect.height(),
                ),
            })
        })
        .collect()
}

/// Borrows an `IntersectionObserver` and the arena to resolve handles.
#[derive(Debug)]
pub(crate) struct ObserverHandle<'a> {
    pub(crate) observer: &'a IntersectionObserver,
    pub(crate) dom: &'a DomHost,
}

impl VisibilityObserver for ObserverHandle<'_> {
    fn observe(&mut self, element: ElementId) {
        if let Some(el) = self.dom.get(element) {
            self.observer.observe(&el);
        }
    }

    fn unobserve(&mut self, element: ElementId) {
        if let Some(el) = self.dom.get(element) {
            self.observer.unobserve(&el);
        }
    }
}

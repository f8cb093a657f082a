// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! DOM element arena.
//!
//! The engine only sees [`ElementId`] handles. [`DomHost`] hands them out the
//! first time it meets an element and keeps the `Element` in a slot vector,
//! like the presenter arena of a compositor backend. A JS `Map` keyed by the
//! element object gives the reverse lookup needed for observer entries and
//! event targets.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;

use js_sys::{Function, Map};
use reveal_core::element::ElementId;
use reveal_core::host::{DocumentQuery, ElementMutator};
use wasm_bindgen::{JsCast as _, JsValue};
use web_sys::Element;

/// Event types forwarded to the engine as transition signals.
pub(crate) const TRANSITION_EVENTS: [&str; 3] =
    ["transitionstart", "transitionend", "transitioncancel"];

/// Maps [`ElementId`] handles to live DOM elements.
pub struct DomHost {
    elements: RefCell<Vec<Element>>,
    ids: Map,
    transition_handler: Option<Function>,
}

impl core::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DomHost")
            .field("elements_len", &self.elements.borrow().len())
            .field("has_transition_handler", &self.transition_handler.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for DomHost {
    fn default() -> Self {
        Self::new()
    }
}

impl DomHost {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self {
            elements: RefCell::new(Vec::new()),
            ids: Map::new(),
            transition_handler: None,
        }
    }

    /// Sets the JS function attached as the transition event listener.
    pub(crate) fn set_transition_handler(&mut self, handler: Function) {
        self.transition_handler = Some(handler);
    }

    /// Returns the handle of `element`, allocating one on first sight.
    pub fn intern(&self, element: &Element) -> ElementId {
        if let Some(id) = self.lookup(element) {
            return id;
        }
        let mut elements = self.elements.borrow_mut();
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a page never holds u32::MAX reveal elements"
        )]
        let id = ElementId(elements.len() as u32);
        elements.push(element.clone());
        self.ids.set(element, &JsValue::from(id.index()));
        id
    }

    /// Returns the handle of `element`, if it was interned.
    #[must_use]
    pub fn lookup(&self, element: &Element) -> Option<ElementId> {
        let raw = self.ids.get(element).as_f64()?;
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "the map only stores u32 slot indices"
        )]
        let index = raw as u32;
        Some(ElementId(index))
    }

    /// Returns the element behind `id`.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<Element> {
        self.elements.borrow().get(id.index() as usize).cloned()
    }

    /// Returns the number of interned elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.borrow().len()
    }

    /// Returns `true` if no element was interned yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DocumentQuery for DomHost {
    fn descendants_with_attribute(
        &self,
        container: ElementId,
        attribute: &str,
    ) -> Vec<ElementId> {
        let Some(container) = self.get(container) else {
            return Vec::new();
        };
        let Ok(list) = container.query_selector_all(&attribute_selector(attribute)) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|el| self.intern(&el))
            .collect()
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.get(element)?.get_attribute(name)
    }
}

impl ElementMutator for DomHost {
    fn add_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.get(element) {
            let _ = el.class_list().add_1(class);
        }
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        if let Some(el) = self.get(element) {
            let _ = el.class_list().remove_1(class);
        }
    }

    fn listen_transitions(&mut self, element: ElementId) {
        let (Some(el), Some(handler)) = (self.get(element), &self.transition_handler) else {
            return;
        };
        for event in TRANSITION_EVENTS {
            let _ = el.add_event_listener_with_callback(event, handler);
        }
    }

    fn unlisten_transitions(&mut self, element: ElementId) {
        let (Some(el), Some(handler)) = (self.get(element), &self.transition_handler) else {
            return;
        };
        for event in TRANSITION_EVENTS {
            let _ = el.remove_event_listener_with_callback(event, handler);
        }
    }
}

/// Builds a CSS attribute-presence selector, quoting nothing: attribute
/// names produced by `AttributeNames` are plain identifiers.
pub(crate) fn attribute_selector(attribute: &str) -> String {
    format!("[{attribute}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_wraps_the_attribute_name() {
        assert_eq!(attribute_selector("data-visible-class"), "[data-visible-class]");
    }

    #[test]
    fn transition_events_cover_start_end_and_cancel() {
        assert!(TRANSITION_EVENTS.contains(&"transitioncancel"));
        assert_eq!(TRANSITION_EVENTS.len(), 3);
    }
}

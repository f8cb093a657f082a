// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Trigger and receiver registration.
//!
//! [`ElementRegistry`] scans a container once and records two maps:
//!
//! - **triggers**: elements whose visibility is watched, with their
//!   [`TriggerOptions`];
//! - **receivers**: per [`TriggerKey`], the elements that get a class when
//!   that trigger becomes visible, in discovery order.
//!
//! Three candidate sets are read from the container:
//!
//! | Set               | Selector                                   | Becomes            |
//! |-------------------|--------------------------------------------|--------------------|
//! | self triggers     | visible class, no foreign trigger          | trigger + receiver |
//! | foreign triggers  | element name                               | trigger            |
//! | foreign receivers | foreign trigger                            | receiver           |
//!
//! Triggers are visited self triggers first, then foreign triggers; receivers
//! self triggers first, then foreign receivers. Each set is in document order.
//!
//! A trigger is stored at most once. The first registration wins: a later
//! candidate for the same element (another container scan, or an element that
//! is both a self trigger and a named trigger) is skipped without a
//! notification and without touching the stored stagger.
//!
//! Two foreign triggers sharing one name are not detected. Their receivers
//! are revealed by whichever of them becomes visible first.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::attributes::{AttributeNames, parse_millis};
use crate::element::{ElementId, TriggerKey};
use crate::host::DocumentQuery;
use crate::time::Millis;
use crate::trace::{ReceiverRegisteredEvent, Tracer, TriggerRegisteredEvent};

/// Options stored for a trigger.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerOptions {
    /// Stagger added to the cumulative delay of the batch the trigger
    /// becomes visible in.
    pub stagger: Millis,
    /// Name under which foreign receivers bind to this trigger.
    pub name: Option<String>,
}

/// An element to reveal when its trigger becomes visible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receiver {
    /// The element receiving the class.
    pub element: ElementId,
    /// Delay between the trigger's "visible" event and the class flip.
    pub delay: Millis,
    /// Class to add. `None` when the attribute is absent or empty.
    pub visible_class: Option<String>,
}

/// Receives a notification for every newly registered trigger.
///
/// Implemented for any `FnMut(ElementId)`.
pub trait TriggerListener {
    /// Called once per trigger, synchronously during the scan, in
    /// registration order.
    fn on_trigger_added(&mut self, trigger: ElementId);
}

impl<F: FnMut(ElementId)> TriggerListener for F {
    fn on_trigger_added(&mut self, trigger: ElementId) {
        self(trigger);
    }
}

/// Registry of triggers and the receivers they reveal.
#[derive(Debug, Default)]
pub struct ElementRegistry {
    attributes: AttributeNames,
    triggers: BTreeMap<ElementId, TriggerOptions>,
    trigger_order: Vec<ElementId>,
    receivers: BTreeMap<TriggerKey, Vec<Receiver>>,
    key_order: Vec<TriggerKey>,
}

impl ElementRegistry {
    /// Creates an empty registry scanning for the given attribute names.
    #[must_use]
    pub fn new(attributes: AttributeNames) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Returns the attribute names this registry scans for.
    #[must_use]
    pub fn attributes(&self) -> &AttributeNames {
        &self.attributes
    }

    /// Scans the descendants of `container` and registers triggers and
    /// receivers.
    ///
    /// `listener` is told about every trigger that was not registered before.
    /// Returns the number of new triggers.
    pub fn register<D, L>(
        &mut self,
        container: ElementId,
        doc: &D,
        listener: &mut L,
        tracer: &mut Tracer<'_>,
    ) -> usize
    where
        D: DocumentQuery + ?Sized,
        L: TriggerListener + ?Sized,
    {
        let names = &self.attributes;
        let foreign_triggers = doc.descendants_with_attribute(container, &names.element_name);
        let self_triggers: Vec<ElementId> = doc
            .descendants_with_attribute(container, &names.visible_class)
            .into_iter()
            .filter(|&el| !doc.has_attribute(el, &names.foreign_trigger))
            .collect();
        let foreign_receivers = doc.descendants_with_attribute(container, &names.foreign_trigger);

        let mut added = 0;
        for &trigger in self_triggers.iter().chain(&foreign_triggers) {
            if self.add_trigger(trigger, doc, tracer) {
                listener.on_trigger_added(trigger);
                added += 1;
            }
        }
        for &receiver in self_triggers.iter().chain(&foreign_receivers) {
            self.add_receiver(receiver, doc, tracer);
        }
        added
    }

    /// Stores a trigger unless it is already present.
    fn add_trigger<D>(&mut self, trigger: ElementId, doc: &D, tracer: &mut Tracer<'_>) -> bool
    where
        D: DocumentQuery + ?Sized,
    {
        if self.triggers.contains_key(&trigger) {
            return false;
        }

        let stagger = doc
            .attribute(trigger, &self.attributes.stagger)
            .map_or(Millis::ZERO, |raw| parse_millis(&raw));
        let name = doc
            .attribute(trigger, &self.attributes.element_name)
            .filter(|name| !name.is_empty());

        tracer.trigger_registered(&TriggerRegisteredEvent {
            trigger,
            stagger,
            named: name.is_some(),
        });
        self.triggers.insert(trigger, TriggerOptions { stagger, name });
        self.trigger_order.push(trigger);
        true
    }

    /// Appends a receiver record under its trigger key.
    ///
    /// A record for the same element under the same key is not duplicated,
    /// so scanning a container twice leaves the receiver lists unchanged.
    fn add_receiver<D>(&mut self, element: ElementId, doc: &D, tracer: &mut Tracer<'_>)
    where
        D: DocumentQuery + ?Sized,
    {
        let names = &self.attributes;
        let delay = doc
            .attribute(element, &names.delay)
            .map_or(Millis::ZERO, |raw| parse_millis(&raw));
        let visible_class = doc
            .attribute(element, &names.visible_class)
            .filter(|class| !class.is_empty());
        let key = match doc.attribute(element, &names.foreign_trigger) {
            Some(name) if !name.is_empty() => TriggerKey::Named(name),
            _ => TriggerKey::Physical(element),
        };

        let named = key.is_named();
        if !self.receivers.contains_key(&key) {
            self.key_order.push(key.clone());
        }
        let list = self.receivers.entry(key).or_default();
        if list.iter().any(|r| r.element == element) {
            return;
        }

        tracer.receiver_registered(&ReceiverRegisteredEvent {
            receiver: element,
            named,
            delay,
        });
        list.push(Receiver {
            element,
            delay,
            visible_class,
        });
    }

    /// Returns the receivers revealed by `trigger`.
    ///
    /// Receivers bound to the element itself come first, followed by the
    /// receivers bound to the trigger's name. Unknown elements yield nothing.
    pub fn receivers_for(&self, trigger: ElementId) -> impl Iterator<Item = &Receiver> {
        let own = self.receivers_for_key(&TriggerKey::Physical(trigger));
        let named: &[Receiver] = match self.triggers.get(&trigger).and_then(|o| o.name.as_deref()) {
            Some(name) => self.receivers_for_name(name),
            None => &[],
        };
        own.iter().chain(named)
    }

    /// Returns the receivers stored under `key`, or an empty slice.
    #[must_use]
    pub fn receivers_for_key(&self, key: &TriggerKey) -> &[Receiver] {
        self.receivers.get(key).map_or(&[][..], Vec::as_slice)
    }

    /// Returns the receivers bound to the trigger name `name`.
    #[must_use]
    pub fn receivers_for_name(&self, name: &str) -> &[Receiver] {
        self.receivers_for_key(&TriggerKey::Named(String::from(name)))
    }

    /// Returns the options of `trigger`, or `None` if it was never registered.
    #[must_use]
    pub fn options_for(&self, trigger: ElementId) -> Option<&TriggerOptions> {
        self.triggers.get(&trigger)
    }

    /// Returns `true` if `element` is a registered trigger.
    #[must_use]
    pub fn is_trigger(&self, element: ElementId) -> bool {
        self.triggers.contains_key(&element)
    }

    /// Returns registered triggers in registration order.
    #[must_use]
    pub fn triggers(&self) -> &[ElementId] {
        &self.trigger_order
    }

    /// Returns receiver keys in the order they were first used.
    #[must_use]
    pub fn receiver_keys(&self) -> &[TriggerKey] {
        &self.key_order
    }

    /// Returns the number of registered triggers.
    #[must_use]
    pub fn trigger_count(&self) -> usize {
        self.trigger_order.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use alloc::vec;

    /// A flat document: element 0 is the container, every other element is
    /// one of its descendants, in index order.
    pub(crate) struct FlatDoc {
        pub(crate) elements: Vec<Vec<(&'static str, &'static str)>>,
    }

    impl FlatDoc {
        pub(crate) fn new() -> Self {
            Self {
                elements: vec![Vec::new()],
            }
        }

        pub(crate) fn push(&mut self, attrs: &[(&'static str, &'static str)]) -> ElementId {
            self.elements.push(attrs.to_vec());
            ElementId(u32::try_from(self.elements.len() - 1).unwrap())
        }
    }

    impl DocumentQuery for FlatDoc {
        fn descendants_with_attribute(
            &self,
            container: ElementId,
            attribute: &str,
        ) -> Vec<ElementId> {
            if container != ElementId(0) {
                return Vec::new();
            }
            (1..self.elements.len())
                .filter(|&i| self.elements[i].iter().any(|(k, _)| *k == attribute))
                .map(|i| ElementId(u32::try_from(i).unwrap()))
                .collect()
        }

        fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
            self.elements
                .get(element.0 as usize)?
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| String::from(*v))
        }
    }

    const CLASS: &str = "data-visible-class";
    const NAME: &str = "data-element-name";
    const FOREIGN: &str = "data-foreign-trigger";
    const STAGGER: &str = "data-stagger";
    const DELAY: &str = "data-delay";

    struct Page {
        doc: FlatDoc,
        el1_1: ElementId,
        el1_2: ElementId,
        el2_1: ElementId,
        el3_1: ElementId,
        el3_2: ElementId,
        el4_1: ElementId,
        el4_2: ElementId,
        el5_1: ElementId,
    }

    fn page() -> Page {
        let mut doc = FlatDoc::new();
        let el1_1 = doc.push(&[(CLASS, "visClass1-1")]);
        let el1_2 = doc.push(&[(CLASS, "visClass1-2"), (DELAY, "100")]);
        let el2_1 = doc.push(&[(CLASS, "visClass2-1"), (NAME, "vis2name")]);
        let el3_1 = doc.push(&[(CLASS, "visClass3-1"), (FOREIGN, "vis2name")]);
        let el3_2 = doc.push(&[(CLASS, "visClass3-2"), (FOREIGN, "vis2name")]);
        let el4_1 = doc.push(&[(CLASS, "visClass4-1")]);
        let el4_2 = doc.push(&[(CLASS, "visClass4-2"), (STAGGER, "100")]);
        let el5_1 = doc.push(&[(NAME, "vis5name")]);
        Page {
            doc,
            el1_1,
            el1_2,
            el2_1,
            el3_1,
            el3_2,
            el4_1,
            el4_2,
            el5_1,
        }
    }

    fn register(registry: &mut ElementRegistry, doc: &FlatDoc) -> Vec<ElementId> {
        let mut added = Vec::new();
        registry.register(
            ElementId(0),
            doc,
            &mut |el: ElementId| added.push(el),
            &mut Tracer::none(),
        );
        added
    }

    #[test]
    fn registers_triggers_in_scan_order() {
        let p = page();
        let mut registry = ElementRegistry::default();
        register(&mut registry, &p.doc);

        assert_eq!(
            registry.triggers(),
            &[p.el1_1, p.el1_2, p.el2_1, p.el4_1, p.el4_2, p.el5_1]
        );
        assert_eq!(registry.options_for(p.el1_1).unwrap().stagger, Millis(0));
        assert_eq!(registry.options_for(p.el4_2).unwrap().stagger, Millis(100));
    }

    #[test]
    fn registers_receivers_with_foreign_keys_last() {
        let p = page();
        let mut registry = ElementRegistry::default();
        register(&mut registry, &p.doc);

        assert_eq!(
            registry.receiver_keys(),
            &[
                TriggerKey::Physical(p.el1_1),
                TriggerKey::Physical(p.el1_2),
                TriggerKey::Physical(p.el2_1),
                TriggerKey::Physical(p.el4_1),
                TriggerKey::Physical(p.el4_2),
                TriggerKey::Named(String::from("vis2name")),
            ]
        );
        assert_eq!(
            registry.receivers_for_key(&TriggerKey::Physical(p.el1_1)),
            &[Receiver {
                element: p.el1_1,
                delay: Millis(0),
                visible_class: Some(String::from("visClass1-1")),
            }]
        );
        assert_eq!(
            registry.receivers_for_key(&p.el1_2.into())[0].delay,
            Millis(100)
        );
        let named = registry.receivers_for_name("vis2name");
        assert_eq!(named.len(), 2);
        assert_eq!(named[0].element, p.el3_1);
        assert_eq!(named[1].element, p.el3_2);
    }

    #[test]
    fn receivers_for_concatenates_own_then_named() {
        let p = page();
        let mut registry = ElementRegistry::default();
        register(&mut registry, &p.doc);

        let elements: Vec<_> = registry.receivers_for(p.el2_1).map(|r| r.element).collect();
        assert_eq!(elements, vec![p.el2_1, p.el3_1, p.el3_2]);
        assert_eq!(registry.receivers_for(ElementId(0)).count(), 0);
        // A named trigger without receivers of its own.
        assert_eq!(registry.receivers_for(p.el5_1).count(), 0);
    }

    #[test]
    fn unknown_trigger_has_no_options() {
        let p = page();
        let mut registry = ElementRegistry::default();
        register(&mut registry, &p.doc);

        assert_eq!(registry.options_for(ElementId(0)), None);
        assert_eq!(registry.options_for(ElementId(999)), None);
    }

    #[test]
    fn notifies_once_per_trigger() {
        let p = page();
        let mut registry = ElementRegistry::default();
        let added = register(&mut registry, &p.doc);

        // el2_1 is both a self trigger and a named trigger.
        assert_eq!(added.len(), 6);
        assert_eq!(added[0], p.el1_1);
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let p = page();
        let mut registry = ElementRegistry::default();
        register(&mut registry, &p.doc);
        let again = register(&mut registry, &p.doc);

        assert!(again.is_empty(), "second scan must not notify");
        assert_eq!(registry.trigger_count(), 6);
        assert_eq!(registry.receivers_for(p.el2_1).count(), 3);
    }

    #[test]
    fn first_registration_keeps_its_stagger() {
        let mut first = FlatDoc::new();
        let el = first.push(&[(CLASS, "a"), (STAGGER, "40")]);
        let mut registry = ElementRegistry::default();
        register(&mut registry, &first);

        first.elements[el.0 as usize] = vec![(CLASS, "a"), (STAGGER, "900")];
        register(&mut registry, &first);
        assert_eq!(registry.options_for(el).unwrap().stagger, Millis(40));
    }

    #[test]
    fn malformed_numbers_and_empty_classes() {
        let mut doc = FlatDoc::new();
        let el = doc.push(&[(CLASS, ""), (STAGGER, "soon"), (DELAY, "-5")]);
        let mut registry = ElementRegistry::default();
        register(&mut registry, &doc);

        assert_eq!(registry.options_for(el).unwrap().stagger, Millis(0));
        let receiver = registry.receivers_for(el).next().unwrap();
        assert_eq!(receiver.delay, Millis(0));
        assert_eq!(receiver.visible_class, None);
    }

    #[test]
    fn empty_foreign_trigger_binds_to_self() {
        let mut doc = FlatDoc::new();
        let named = doc.push(&[(NAME, "hero")]);
        let el = doc.push(&[(CLASS, "in"), (FOREIGN, "")]);
        let mut registry = ElementRegistry::default();
        register(&mut registry, &doc);

        assert!(!registry.is_trigger(el), "foreign receivers are not self triggers");
        assert_eq!(
            registry.receivers_for_key(&TriggerKey::Physical(el))[0].element,
            el
        );
        assert_eq!(registry.receivers_for(named).count(), 0);
    }
}

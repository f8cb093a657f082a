// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! In-memory element tree.

use alloc::string::String;
use alloc::vec::Vec;

use reveal_core::element::ElementId;
use reveal_core::host::{DocumentQuery, ElementMutator};

/// Bounding height given to elements that never had one set.
pub const DEFAULT_HEIGHT: f64 = 100.0;

/// A recorded call on the [`ElementMutator`] side of a [`FakeDocument`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    /// A class was added.
    AddClass(ElementId, String),
    /// A class was removed.
    RemoveClass(ElementId, String),
    /// Transition listeners were attached.
    Listen(ElementId),
    /// Transition listeners were detached.
    Unlisten(ElementId),
}

#[derive(Clone, Debug)]
struct Node {
    children: Vec<ElementId>,
    attributes: Vec<(String, String)>,
    classes: Vec<String>,
    height: f64,
    listening: bool,
}

impl Node {
    fn new() -> Self {
        Self {
            children: Vec::new(),
            attributes: Vec::new(),
            classes: Vec::new(),
            height: DEFAULT_HEIGHT,
            listening: false,
        }
    }
}

/// A tree of elements with attributes, class lists and heights.
///
/// Element 0 is the root. Elements are never removed, so an [`ElementId`]
/// handed out by [`append`](Self::append) stays valid.
///
/// Handles this document never issued behave like an empty element: queries
/// return nothing and mutations are ignored.
#[derive(Clone, Debug)]
pub struct FakeDocument {
    nodes: Vec<Node>,
    mutations: Vec<Mutation>,
}

impl Default for FakeDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeDocument {
    /// Creates a document containing only the root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: alloc::vec![Node::new()],
            mutations: Vec::new(),
        }
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Returns the number of elements, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the document holds only the root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Appends a new last child to `parent` with the given attributes.
    pub fn append(&mut self, parent: ElementId, attributes: &[(&str, &str)]) -> ElementId {
        #[expect(
            clippy::cast_possible_truncation,
            reason = "a test document never holds u32::MAX elements"
        )]
        let id = ElementId(self.nodes.len() as u32);
        let mut node = Node::new();
        node.attributes = attributes
            .iter()
            .map(|&(k, v)| (String::from(k), String::from(v)))
            .collect();
        self.nodes.push(node);
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }
        id
    }

    /// Sets or replaces an attribute.
    pub fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        let attributes = &mut node.attributes;
        match attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, v)) => *v = String::from(value),
            None => attributes.push((String::from(name), String::from(value))),
        }
    }

    /// Sets the bounding height reported for `element`.
    pub fn set_height(&mut self, element: ElementId, height: f64) {
        if let Some(node) = self.node_mut(element) {
            node.height = height;
        }
    }

    /// Returns the bounding height of `element`, or zero if it is unknown.
    #[must_use]
    pub fn height(&self, element: ElementId) -> f64 {
        self.node(element).map_or(0.0, |node| node.height)
    }

    /// Returns the class list of `element`, in insertion order.
    #[must_use]
    pub fn classes(&self, element: ElementId) -> &[String] {
        self.node(element).map_or(&[][..], |node| &node.classes)
    }

    /// Returns `true` if `element` currently has `class`.
    #[must_use]
    pub fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.node(element)
            .is_some_and(|node| node.classes.iter().any(|c| c == class))
    }

    /// Returns `true` if transition listeners are attached to `element`.
    #[must_use]
    pub fn is_listening(&self, element: ElementId) -> bool {
        self.node(element).is_some_and(|node| node.listening)
    }

    /// Returns every mutation applied so far, oldest first.
    #[must_use]
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    fn node(&self, element: ElementId) -> Option<&Node> {
        self.nodes.get(element.index() as usize)
    }

    fn node_mut(&mut self, element: ElementId) -> Option<&mut Node> {
        self.nodes.get_mut(element.index() as usize)
    }

    fn collect_descendants(&self, element: ElementId, attribute: &str, out: &mut Vec<ElementId>) {
        let Some(node) = self.node(element) else {
            return;
        };
        for &child in &node.children {
            if self
                .node(child)
                .is_some_and(|c| c.attributes.iter().any(|(k, _)| k == attribute))
            {
                out.push(child);
            }
            self.collect_descendants(child, attribute, out);
        }
    }
}

impl DocumentQuery for FakeDocument {
    fn descendants_with_attribute(
        &self,
        container: ElementId,
        attribute: &str,
    ) -> Vec<ElementId> {
        let mut out = Vec::new();
        self.collect_descendants(container, attribute, &mut out);
        out
    }

    fn attribute(&self, element: ElementId, name: &str) -> Option<String> {
        self.node(element)?
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.clone())
    }
}

impl ElementMutator for FakeDocument {
    fn add_class(&mut self, element: ElementId, class: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(String::from(class));
        }
        self.mutations
            .push(Mutation::AddClass(element, String::from(class)));
    }

    fn remove_class(&mut self, element: ElementId, class: &str) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.classes.retain(|c| c != class);
        self.mutations
            .push(Mutation::RemoveClass(element, String::from(class)));
    }

    fn listen_transitions(&mut self, element: ElementId) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.listening = true;
        self.mutations.push(Mutation::Listen(element));
    }

    fn unlisten_transitions(&mut self, element: ElementId) {
        let Some(node) = self.node_mut(element) else {
            return;
        };
        node.listening = false;
        self.mutations.push(Mutation::Unlisten(element));
    }
}

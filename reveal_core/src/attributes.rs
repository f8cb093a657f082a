// Copyright 2026 the Reveal Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Markup attribute names and value parsing.
//!
//! Authors configure reveal behavior entirely through element attributes:
//!
//! | Attribute              | Role                                              |
//! |------------------------|---------------------------------------------------|
//! | `data-visible-class`   | Class added once the element is revealed          |
//! | `data-element-name`    | Makes the element a named trigger for others      |
//! | `data-foreign-trigger` | Binds the element to a named trigger              |
//! | `data-stagger`         | Trigger stagger in milliseconds                   |
//! | `data-delay`           | Receiver delay in milliseconds                    |
//!
//! The names are configurable through [`AttributeNames`].

use alloc::string::String;

use crate::time::Millis;

/// The attribute names the registry scans for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributeNames {
    /// Class name to add when the element is revealed.
    pub visible_class: String,
    /// Name under which the element triggers receivers elsewhere.
    pub element_name: String,
    /// Name of the trigger the element is revealed by.
    pub foreign_trigger: String,
    /// Stagger of a trigger, in milliseconds.
    pub stagger: String,
    /// Delay of a receiver, in milliseconds.
    pub delay: String,
}

impl Default for AttributeNames {
    fn default() -> Self {
        Self {
            visible_class: data_attribute_name("visibleClass"),
            element_name: data_attribute_name("elementName"),
            foreign_trigger: data_attribute_name("foreignTrigger"),
            stagger: data_attribute_name("stagger"),
            delay: data_attribute_name("delay"),
        }
    }
}

impl AttributeNames {
    /// Builds attribute names under a namespace, e.g. `with_prefix("reveal")`
    /// yields `data-reveal-visible-class`, `data-reveal-delay`, and so on.
    ///
    /// `prefix` is a dataset-style (camelCase) key.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let attr = |suffix: &str| {
            let mut key = String::from(prefix);
            let mut chars = suffix.chars();
            if let Some(first) = chars.next() {
                key.push(first.to_ascii_uppercase());
                key.extend(chars);
            }
            data_attribute_name(&key)
        };
        Self {
            visible_class: attr("visibleClass"),
            element_name: attr("elementName"),
            foreign_trigger: attr("foreignTrigger"),
            stagger: attr("stagger"),
            delay: attr("delay"),
        }
    }
}

/// Converts a camelCase dataset key into its `data-*` attribute name.
///
/// Every ASCII uppercase letter becomes a dash followed by its lowercase form:
/// `"myDataName"` becomes `"data-my-data-name"`.
#[must_use]
pub fn data_attribute_name(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 8);
    out.push_str("data-");
    for c in key.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Parses a millisecond attribute value leniently.
///
/// Leading whitespace and an optional sign are accepted, then the leading
/// decimal digits are read (`"100ms"` is 100). Values without leading digits
/// and negative values are zero. Values past `u32::MAX` saturate.
#[must_use]
pub fn parse_millis(raw: &str) -> Millis {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: u32 = 0;
    let mut seen_digit = false;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        seen_digit = true;
        value = value.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }

    if negative || !seen_digit {
        Millis::ZERO
    } else {
        Millis(value)
    }
}

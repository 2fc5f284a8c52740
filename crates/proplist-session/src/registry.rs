//! Property metadata.
//!
//! A registry maps attribute/property names to their declared kinds so
//! a UI can offer typed editors and sensible defaults for additions.
//! When no declaration exists, kinds can be inferred from the values
//! already present in a parsed list.

use std::collections::BTreeMap;

use proplist_edit::{NewEntry, ValueKind};
use proplist_parse::EntryList;

/// Declared metadata for one property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropSpec {
    pub kind: ValueKind,
    pub required: bool,
}

/// A name → [`PropSpec`] lookup table.
#[derive(Debug, Clone, Default)]
pub struct PropRegistry {
    specs: BTreeMap<String, PropSpec>,
}

impl PropRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, name: impl Into<String>, kind: ValueKind, required: bool) {
        self.specs.insert(name.into(), PropSpec { kind, required });
    }

    pub fn get(&self, name: &str) -> Option<&PropSpec> {
        self.specs.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropSpec)> {
        self.specs.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    /// A [`NewEntry`] for `name`, pre-filled from its declared kind.
    /// Undeclared names fall back to [`ValueKind::Any`].
    pub fn new_entry(&self, name: &str) -> NewEntry {
        let kind = self
            .get(name)
            .map(|spec| spec.kind.clone())
            .unwrap_or(ValueKind::Any);
        NewEntry::named(name).with_kind(kind)
    }

    /// Build specs for the entries of a parsed list by classifying their
    /// current values. A value-less attribute is boolean shorthand.
    pub fn infer_from(list: &EntryList) -> Self {
        let mut registry = Self::new();
        for entry in &list.entries {
            let Some(name) = entry.name() else { continue };
            let kind = match &entry.value {
                Some(value) => ValueKind::infer(&value.text, value.delimiter),
                None => ValueKind::Bool,
            };
            registry.declare(name, kind, false);
        }
        registry
    }

    /// Names declared `required` that have no entry in `list`.
    pub fn missing_required<'a>(&'a self, list: &EntryList) -> Vec<&'a str> {
        self.specs
            .iter()
            .filter(|(name, spec)| spec.required && list.entry_named(name).is_none())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proplist_parse::parse_tag_at;

    #[test]
    fn infers_kinds_from_values() {
        let text = "<Box label=\"hi\" pad={4} visible onLayout={() => go()}>";
        let list = parse_tag_at(text, 3).unwrap();
        let registry = PropRegistry::infer_from(&list);
        assert_eq!(registry.get("label").unwrap().kind, ValueKind::String);
        assert_eq!(registry.get("pad").unwrap().kind, ValueKind::Number);
        assert_eq!(registry.get("visible").unwrap().kind, ValueKind::Bool);
        assert_eq!(registry.get("onLayout").unwrap().kind, ValueKind::Function);
    }

    #[test]
    fn new_entry_carries_declared_kind() {
        let mut registry = PropRegistry::new();
        registry.declare("count", ValueKind::Number, true);
        let entry = registry.new_entry("count");
        assert_eq!(entry.kind, Some(ValueKind::Number));
        let entry = registry.new_entry("unknown");
        assert_eq!(entry.kind, Some(ValueKind::Any));
    }

    #[test]
    fn reports_missing_required() {
        let mut registry = PropRegistry::new();
        registry.declare("title", ValueKind::String, true);
        registry.declare("pad", ValueKind::Number, false);
        let list = parse_tag_at("<Card pad={2}>", 3).unwrap();
        assert_eq!(registry.missing_required(&list), vec!["title"]);
    }
}

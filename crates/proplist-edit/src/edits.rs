//! The caller-owned edit set.
//!
//! Edits are recorded against entry indices of a parsed [`EntryList`]
//! and never merged back into it; the list stays an immutable snapshot
//! of the source and the edit set is applied in one pass by
//! [`build_text`](crate::build_text).

use std::collections::{BTreeMap, BTreeSet};

use proplist_parse::Delimiter;

use crate::ValueKind;

/// A batch of edits against one parsed entry list.
#[derive(Debug, Clone, Default)]
pub struct EditSet {
    /// Emission order as entry indices. `None` keeps source order.
    /// Entries absent from an explicit order are dropped, like removals.
    pub order: Option<Vec<usize>>,
    /// Indices to remove, trivia included.
    pub removed: BTreeSet<usize>,
    /// Per-index label/value replacements.
    pub patches: BTreeMap<usize, EntryPatch>,
    /// Entries appended before the closing terminator.
    pub additions: Vec<NewEntry>,
}

impl EditSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_none()
            && self.removed.is_empty()
            && self.patches.is_empty()
            && self.additions.is_empty()
    }

    pub fn remove(&mut self, index: usize) -> &mut Self {
        self.removed.insert(index);
        self
    }

    pub fn reorder(&mut self, order: Vec<usize>) -> &mut Self {
        self.order = Some(order);
        self
    }

    pub fn rename(&mut self, index: usize, name: impl Into<String>) -> &mut Self {
        self.patches.entry(index).or_default().label = Some(name.into());
        self
    }

    /// Replace the value text, keeping the entry's current delimiter.
    pub fn set_value(&mut self, index: usize, text: impl Into<String>) -> &mut Self {
        self.patches.entry(index).or_default().value = Some(ValuePatch::Text {
            text: text.into(),
            delimiter: None,
        });
        self
    }

    /// Replace the value text and its delimiter.
    pub fn set_delimited_value(
        &mut self,
        index: usize,
        text: impl Into<String>,
        delimiter: Delimiter,
    ) -> &mut Self {
        self.patches.entry(index).or_default().value = Some(ValuePatch::Text {
            text: text.into(),
            delimiter: Some(delimiter),
        });
        self
    }

    pub fn set_bool(&mut self, index: usize, value: bool) -> &mut Self {
        self.patches.entry(index).or_default().value = Some(ValuePatch::Bool(value));
        self
    }

    pub fn add(&mut self, entry: NewEntry) -> &mut Self {
        self.additions.push(entry);
        self
    }
}

/// A replacement for one entry's label and/or value.
#[derive(Debug, Clone, Default)]
pub struct EntryPatch {
    pub label: Option<String>,
    pub value: Option<ValuePatch>,
}

/// A replacement value.
#[derive(Debug, Clone)]
pub enum ValuePatch {
    /// New value text; `delimiter: None` keeps the entry's current one.
    Text {
        text: String,
        delimiter: Option<Delimiter>,
    },
    /// Boolean semantics: in tag context `true` serializes as the bare
    /// attribute name and `false` as an explicit `name={false}`, since
    /// omitting the attribute would read as unset.
    Bool(bool),
}

/// An entry to append.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// `None` for spread/computed pseudo-entries.
    pub label: Option<String>,
    /// Explicit value text. `None` takes the kind's default value.
    pub value: Option<String>,
    /// Explicit delimiter. `None` infers one from the value or kind.
    pub delimiter: Option<Delimiter>,
    /// Declared type, used for the default value and delimiter choice.
    pub kind: Option<ValueKind>,
}

impl NewEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            label: Some(name.into()),
            ..Self::default()
        }
    }

    /// A spread or computed pseudo-entry (`{...rest}` / `...rest`).
    pub fn spread(expression: impl Into<String>) -> Self {
        Self {
            label: None,
            value: Some(expression.into()),
            delimiter: None,
            kind: None,
        }
    }

    pub fn with_value(mut self, text: impl Into<String>) -> Self {
        self.value = Some(text.into());
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_kind(mut self, kind: ValueKind) -> Self {
        self.kind = Some(kind);
        self
    }
}

//! Reconciliation of edited entry lists back into source text.
//!
//! Edits are described by a caller-owned [`EditSet`] against the entry
//! indices of a parsed [`EntryList`](proplist_parse::EntryList);
//! [`build_text`] applies them in one pass. Untouched entries reproduce
//! their original bytes exactly, so a no-op edit is a byte-identical
//! round trip.

mod build;
mod context;
mod edits;
mod value_kind;

pub use build::{BuiltText, build_text};
pub use context::SerializationContext;
pub use edits::{EditSet, EntryPatch, NewEntry, ValuePatch};
pub use value_kind::ValueKind;

pub use proplist_parse::{Delimiter, EntryList, ListKind};

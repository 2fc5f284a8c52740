//! Lossless parsing of JSX attribute lists and object-literal
//! property lists.
//!
//! Given source text and a cursor offset, this crate locates the
//! enclosing tag or object literal and parses its entries into a
//! span-exact [`EntryList`]: the concatenation of every entry's raw span
//! reproduces the list's interior byte for byte. Re-serialization of an
//! edited list lives in `proplist-edit`.

mod diagnostic;
mod entry;
mod error;
mod locate;
mod parser;

pub use diagnostic::{render_report, write_report};
pub use entry::{Delimiter, Entry, EntryList, Label, ListKind, Terminator, Trivia, Value};
pub use error::{Error, LocateError, ParseError};
pub use locate::{
    DocumentIndex, LocatedTag, locate_enclosing_object_literal, locate_enclosing_tag,
};
pub use parser::{parse_entries, parse_object_at, parse_tag_at};

pub use proplist_scan::{ScanError, Span};

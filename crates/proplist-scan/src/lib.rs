//! Character-level scanning primitives for attribute and property lists.
//!
//! This crate is the only place where quote, comment, and bracket
//! awareness lives. The locator and the entry parser in `proplist-parse`
//! compose these four primitives instead of re-implementing escape or
//! nesting logic.

mod error;
mod scan;
mod span;

pub use error::ScanError;
pub use scan::{
    closing_bracket, is_comment_start, is_open_bracket, is_quote_char, scan_to_any_of,
    skip_balanced_block, skip_comment, skip_quoted_string,
};
pub use span::Span;

//! Forward-scanning block locator.
//!
//! Instead of scanning backward from the cursor (which misfires when
//! angle brackets or braces appear inside string literals before the
//! real boundary), the whole document is tokenized once in a forward
//! pass that records tag boundaries and brace spans, skipping strings
//! and comments with the scan primitives. Queries are then answered by
//! binary search over the recorded boundaries.

use proplist_scan::{ScanError, is_comment_start, skip_comment, skip_quoted_string};
use tracing::trace;

use crate::LocateError;

/// A located opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedTag {
    /// The tag name (`View`, `Animated.View`, …).
    pub name: String,
    /// Offset of the `<`.
    pub tag_start: usize,
    /// Offset just past the tag name, where the attribute region begins.
    pub attributes_start: usize,
}

/// A `{…}` span recorded during the forward pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BraceSpan {
    /// Offset of the `{`.
    open: usize,
    /// Offset just past the matching `}`; `None` when never closed.
    close: Option<usize>,
}

/// Tag and brace boundaries for one document, recorded in a single
/// forward pass.
#[derive(Debug, Clone)]
pub struct DocumentIndex {
    tags: Vec<LocatedTag>,
    braces: Vec<BraceSpan>,
}

/// Whether `c` can appear in a tag identifier. Dashes are excluded:
/// React Native components cannot have dashed names.
fn is_tag_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '$' | '_')
}

impl DocumentIndex {
    /// Tokenize the document and record every tag boundary and brace
    /// span. Strings and comments are skipped atomically, so brackets
    /// and angle brackets inside them are never recorded.
    pub fn build(text: &str) -> Result<Self, ScanError> {
        let bytes = text.as_bytes();
        let mut tags = Vec::new();
        let mut braces: Vec<BraceSpan> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();

        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i] as char;
            if matches!(c, '"' | '\'' | '`') {
                i = skip_quoted_string(text, i)?;
            } else if is_comment_start(text, i) {
                i = skip_comment(text, i)?;
            } else if c == '<' {
                match read_tag_name(text, i) {
                    Some((name, attributes_start)) => {
                        trace!(tag_start = i, %name, "indexed tag");
                        tags.push(LocatedTag {
                            name,
                            tag_start: i,
                            attributes_start,
                        });
                        i = attributes_start;
                    }
                    None => i += 1,
                }
            } else if c == '{' {
                stack.push(braces.len());
                braces.push(BraceSpan {
                    open: i,
                    close: None,
                });
                i += 1;
            } else if c == '}' {
                if let Some(slot) = stack.pop() {
                    braces[slot].close = Some(i + 1);
                }
                i += 1;
            } else {
                i += 1;
            }
        }

        Ok(Self { tags, braces })
    }

    /// The nearest tag starting at or before `offset`.
    pub fn enclosing_tag(&self, offset: usize) -> Option<&LocatedTag> {
        let idx = self.tags.partition_point(|t| t.tag_start <= offset);
        idx.checked_sub(1).map(|i| &self.tags[i])
    }

    /// The innermost brace span containing `offset`, returned as the
    /// offset of its `{`.
    ///
    /// Deliberately heuristic: a code block and an object literal look
    /// identical here, and callers only invoke this where that
    /// ambiguity is acceptable.
    pub fn enclosing_object(&self, offset: usize) -> Option<usize> {
        let idx = self.braces.partition_point(|b| b.open <= offset);
        self.braces[..idx]
            .iter()
            .rev()
            .find(|b| b.close.is_none_or(|close| offset < close))
            .map(|b| b.open)
    }
}

/// Read a tag identifier immediately following the `<` at `lt_index`.
///
/// The identifier must be non-empty and followed by whitespace, `>`, or
/// `/>`, mirroring what counts as an opening tag in the editor.
fn read_tag_name(text: &str, lt_index: usize) -> Option<(String, usize)> {
    let rest = &text[lt_index + 1..];
    let name_len = rest
        .char_indices()
        .find(|(_, c)| !is_tag_ident_char(*c))
        .map(|(i, _)| i)
        .unwrap_or(rest.len());
    if name_len == 0 {
        return None;
    }

    let after = &rest[name_len..];
    let valid_boundary = after.starts_with(char::is_whitespace)
        || after.starts_with('>')
        || after.starts_with("/>");
    if !valid_boundary {
        return None;
    }

    let name = rest[..name_len].to_string();
    Some((name, lt_index + 1 + name_len))
}

/// Find the opening tag enclosing `cursor`.
pub fn locate_enclosing_tag(text: &str, cursor: usize) -> Result<LocatedTag, LocateError> {
    let index = DocumentIndex::build(text)?;
    index
        .enclosing_tag(cursor)
        .cloned()
        .ok_or(LocateError::NoEnclosingTag { offset: cursor })
}

/// Find the `{` of the object literal enclosing `cursor`.
pub fn locate_enclosing_object_literal(text: &str, cursor: usize) -> Result<usize, LocateError> {
    let index = DocumentIndex::build(text)?;
    index
        .enclosing_object(cursor)
        .ok_or(LocateError::NoEnclosingObject { offset: cursor })
}

//! The four nesting-aware scanning primitives.
//!
//! All offsets are byte offsets. Every character with structural meaning
//! (quotes, brackets, slashes, commas) is ASCII, so scanning bytes is
//! safe in UTF-8 text: a byte >= 0x80 can never be mistaken for one of
//! them.
//!
//! Convention: `skip_*` functions return the offset just past the
//! construct they consumed; `scan_to_any_of` returns the offset of the
//! character it found.

use tracing::trace;

use crate::ScanError;

/// Check if a character opens a quoted string.
#[inline]
pub fn is_quote_char(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

/// Check if a character opens a bracket block.
#[inline]
pub fn is_open_bracket(c: char) -> bool {
    matches!(c, '(' | '[' | '{')
}

/// The closing bracket matching an opener, if `open` is one.
#[inline]
pub fn closing_bracket(open: char) -> Option<char> {
    match open {
        '(' => Some(')'),
        '[' => Some(']'),
        '{' => Some('}'),
        _ => None,
    }
}

/// Check if `text[index..]` starts a line or block comment.
#[inline]
pub fn is_comment_start(text: &str, index: usize) -> bool {
    let bytes = text.as_bytes();
    bytes.get(index) == Some(&b'/') && matches!(bytes.get(index + 1), Some(b'/' | b'*'))
}

/// Whether the quote at `index` is escaped by a backslash run.
///
/// A quote is escaped when preceded by an odd number of consecutive
/// backslashes; an even run means the backslashes escape each other.
fn is_escaped(bytes: &[u8], index: usize) -> bool {
    let mut count = 0;
    while count < index && bytes[index - 1 - count] == b'\\' {
        count += 1;
    }
    count % 2 == 1
}

/// Skip a quoted string.
///
/// `text[open_index]` is the quote character; the scan looks for the next
/// occurrence of the same character, continuing past escaped quotes.
/// Returns the offset just past the closing quote.
pub fn skip_quoted_string(text: &str, open_index: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let quote = bytes[open_index];
    debug_assert!(is_quote_char(quote as char));

    let mut i = open_index + 1;
    while i < bytes.len() {
        if bytes[i] == quote && !is_escaped(bytes, i) {
            return Ok(i + 1);
        }
        i += 1;
    }
    Err(ScanError::UnterminatedString {
        start: open_index,
        quote: quote as char,
    })
}

/// Skip a comment starting at `start_index`.
///
/// Line comments run to (not including) the next newline or end of text;
/// block comments run through the closing `*/`. A lone `/` that opens no
/// comment advances by a single byte so callers can continue scanning.
pub fn skip_comment(text: &str, start_index: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    match bytes.get(start_index + 1) {
        Some(b'/') => match text[start_index..].find('\n') {
            Some(offset) => Ok(start_index + offset),
            None => Ok(text.len()),
        },
        Some(b'*') => match text[start_index + 2..].find("*/") {
            Some(offset) => Ok(start_index + 2 + offset + 2),
            None => Err(ScanError::UnterminatedComment { start: start_index }),
        },
        _ => Ok(start_index + 1),
    }
}

/// Skip a balanced bracket block.
///
/// `text[open_index]` is one of `(`, `[`, `{`. The depth counter starts
/// at 1; quoted strings and comments are skipped atomically *before* any
/// bracket is counted, so a bracket inside a string or comment never
/// affects depth. Returns the offset just past the matching close.
pub fn skip_balanced_block(text: &str, open_index: usize) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let open = bytes[open_index] as char;
    let Some(close) = closing_bracket(open) else {
        return Err(ScanError::UnbalancedBracket {
            start: open_index,
            open,
        });
    };

    let mut depth = 1usize;
    let mut i = open_index + 1;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if is_quote_char(c) {
            i = skip_quoted_string(text, i)?;
        } else if is_comment_start(text, i) {
            i = skip_comment(text, i)?;
        } else {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth == 0 {
                    trace!(open_index, end = i + 1, %open, "skipped block");
                    return Ok(i + 1);
                }
            }
            i += 1;
        }
    }
    Err(ScanError::UnbalancedBracket {
        start: open_index,
        open,
    })
}

/// Scan forward to the first unnested occurrence of any target character.
///
/// Quotes, comments, and bracket blocks are treated as atomic: their
/// interior characters never match, even when they appear in `targets`.
/// A target is checked before atomic skipping, so a target that is itself
/// an opener (such as `{`) is still found at depth 0.
pub fn scan_to_any_of(text: &str, from_index: usize, targets: &[char]) -> Result<usize, ScanError> {
    let bytes = text.as_bytes();
    let mut i = from_index;
    while i < bytes.len() {
        let c = bytes[i] as char;
        if targets.contains(&c) {
            return Ok(i);
        }
        if is_quote_char(c) {
            i = skip_quoted_string(text, i)?;
        } else if is_comment_start(text, i) {
            i = skip_comment(text, i)?;
        } else if is_open_bracket(c) {
            i = skip_balanced_block(text, i)?;
        } else {
            i += 1;
        }
    }
    Err(ScanError::ScanNotFound {
        from: from_index,
        targets: targets.iter().collect(),
    })
}

//! The entry list parser.
//!
//! A small state machine over the scan primitives:
//! `ExpectLabel → LabelRead → (ExpectValue → ValueRead)? → (loop | Done)`.
//! Each iteration consumes exactly one entry; the byte range between one
//! entry's end and the next entry's start is always empty, which is what
//! makes the resulting [`EntryList`] span-exact.
//!
//! Parsing is all-or-nothing: any error discards the partial result and
//! the caller must not apply edits.

use proplist_scan::{
    Span, is_comment_start, is_quote_char, scan_to_any_of, skip_balanced_block, skip_comment,
    skip_quoted_string,
};
use tracing::debug;

use crate::{
    Delimiter, Entry, EntryList, Error, Label, ListKind, ParseError, ScanError, Terminator, Trivia,
    Value, locate_enclosing_object_literal, locate_enclosing_tag,
};

/// Parse the attribute list of the tag enclosing `cursor`.
pub fn parse_tag_at(text: &str, cursor: usize) -> Result<EntryList, Error> {
    let tag = locate_enclosing_tag(text, cursor)?;
    let mut list =
        parse_entries(text, tag.attributes_start, ListKind::Tag).map_err(Error::Parse)?;
    list.owner_name = Some(tag.name);
    Ok(list)
}

/// Parse the property list of the object literal enclosing `cursor`.
pub fn parse_object_at(text: &str, cursor: usize) -> Result<EntryList, Error> {
    let object_start = locate_enclosing_object_literal(text, cursor)?;
    parse_entries(text, object_start + 1, ListKind::ObjectLiteral).map_err(Error::Parse)
}

/// Parse entries from `start_index` (the first byte of the entry region)
/// to the list's closing terminator.
pub fn parse_entries(
    text: &str,
    start_index: usize,
    kind: ListKind,
) -> Result<EntryList, ParseError> {
    EntryParser {
        text,
        kind,
        start_index,
        pos: start_index,
        entries: Vec::new(),
        preferred_quote: None,
    }
    .parse()
}

/// Whether `c` can appear in an attribute or property name. Dashes are
/// allowed for `data-*`/`aria-*` style attributes.
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '$' | '_' | '-')
}

struct EntryParser<'src> {
    text: &'src str,
    kind: ListKind,
    start_index: usize,
    pos: usize,
    entries: Vec<Entry>,
    preferred_quote: Option<char>,
}

impl<'src> EntryParser<'src> {
    fn parse(mut self) -> Result<EntryList, ParseError> {
        loop {
            let entry_start = self.pos;
            let sig = match self.kind {
                // Tag context keeps comments out of the whitespace skip so
                // a bare comment becomes its own pseudo-entry.
                ListKind::Tag => self.whitespace_end(entry_start),
                ListKind::ObjectLiteral => self.trivia_end(entry_start)?,
            };

            if let Some(terminator) = self.closer_at(sig) {
                if sig > entry_start {
                    // Trailing trivia belongs to no entry; capture it as a
                    // final pseudo-entry so raw spans cover every byte.
                    self.entries.push(Entry {
                        label: Label {
                            trivia: Trivia::new(&self.text[entry_start..sig], ""),
                            text: None,
                            is_spread: false,
                        },
                        value: None,
                        raw_span: Span::new(entry_start, sig),
                        trailing_comma: false,
                    });
                }
                debug!(
                    entries = self.entries.len(),
                    entries_end = sig,
                    "parsed entry list"
                );
                return Ok(EntryList {
                    kind: self.kind,
                    owner_name: None,
                    entries_start: self.start_index,
                    entries_end: sig,
                    terminator,
                    entries: self.entries,
                    preferred_quote: self.preferred_quote,
                });
            }

            if sig >= self.text.len() {
                return Err(ParseError::UnterminatedEntryList {
                    start: self.start_index,
                });
            }

            let entry = match self.kind {
                ListKind::Tag => self.parse_tag_entry(entry_start, sig)?,
                ListKind::ObjectLiteral => self.parse_object_entry(entry_start, sig)?,
            };
            self.pos = entry.raw_span.end;
            self.entries.push(entry);
        }
    }

    /// The list's closing terminator at `i`, if present.
    fn closer_at(&self, i: usize) -> Option<Terminator> {
        let bytes = self.text.as_bytes();
        match self.kind {
            ListKind::Tag => match bytes.get(i) {
                Some(b'>') => Some(Terminator::AngleClose),
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => Some(Terminator::SelfClose),
                _ => None,
            },
            ListKind::ObjectLiteral => {
                (bytes.get(i) == Some(&b'}')).then_some(Terminator::CloseBrace)
            }
        }
    }

    /// Offset of the first non-whitespace byte at or after `from`.
    fn whitespace_end(&self, from: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut i = from;
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t' | b'\n' | b'\r') {
            i += 1;
        }
        i
    }

    /// Offset of the first byte after whitespace *and* comments.
    fn trivia_end(&self, from: usize) -> Result<usize, ParseError> {
        let mut i = from;
        loop {
            i = self.whitespace_end(i);
            if is_comment_start(self.text, i) {
                i = skip_comment(self.text, i)?;
            } else {
                return Ok(i);
            }
        }
    }

    /// `scan_to_any_of` with `ScanNotFound` mapped to the list-level
    /// unterminated error (the closer was never reached).
    fn scan_list(&self, from: usize, targets: &[char]) -> Result<usize, ParseError> {
        scan_to_any_of(self.text, from, targets).map_err(|err| match err {
            ScanError::ScanNotFound { .. } => ParseError::UnterminatedEntryList {
                start: self.start_index,
            },
            other => ParseError::Scan(other),
        })
    }

    fn char_at(&self, i: usize) -> char {
        self.text[i..].chars().next().unwrap_or('\u{fffd}')
    }

    /// One attribute: `name`, `name=value`, `{...spread}`, or a bare
    /// comment pseudo-entry.
    fn parse_tag_entry(&mut self, entry_start: usize, sig: usize) -> Result<Entry, ParseError> {
        let text = self.text;
        let pre = &text[entry_start..sig];

        if is_comment_start(text, sig) {
            let end = skip_comment(text, sig)?;
            return Ok(Entry {
                label: Label {
                    trivia: Trivia::new(&text[entry_start..end], ""),
                    text: None,
                    is_spread: false,
                },
                value: None,
                raw_span: Span::new(entry_start, end),
                trailing_comma: false,
            });
        }

        if text.as_bytes()[sig] == b'{' {
            // Spread (`{...rest}`) or a computed pseudo-entry.
            let end = skip_balanced_block(text, sig)?;
            let body = &text[sig + 1..end - 1];
            return Ok(Entry {
                label: Label {
                    trivia: Trivia::new(pre, ""),
                    text: None,
                    is_spread: body.trim_start().starts_with("..."),
                },
                value: Some(Value {
                    trivia: Trivia::default(),
                    text: body.to_string(),
                    delimiter: Delimiter::Computed,
                }),
                raw_span: Span::new(entry_start, end),
                trailing_comma: false,
            });
        }

        let name_end = self.name_end(sig);
        if name_end == sig {
            return Err(ParseError::UnexpectedCharacter {
                offset: sig,
                found: self.char_at(sig),
            });
        }
        let name = text[sig..name_end].to_string();

        // Only commit the lookahead when an `=` actually follows;
        // otherwise the trivia belongs to the next entry.
        let after = self.trivia_end(name_end)?;
        if text.as_bytes().get(after) != Some(&b'=') {
            return Ok(Entry {
                label: Label {
                    trivia: Trivia::new(pre, ""),
                    text: Some(name),
                    is_spread: false,
                },
                value: None,
                raw_span: Span::new(entry_start, name_end),
                trailing_comma: false,
            });
        }

        let label = Label {
            trivia: Trivia::new(pre, &text[name_end..after]),
            text: Some(name),
            is_spread: false,
        };
        let value_start = after + 1;
        let value_sig = self.trivia_end(value_start)?;
        if value_sig >= text.len() {
            return Err(ParseError::UnterminatedEntryList {
                start: self.start_index,
            });
        }
        let value_pre = &text[value_start..value_sig];

        let c = text.as_bytes()[value_sig] as char;
        let (value, end) = if let Some(delimiter) = Delimiter::from_quote(c) {
            let end = skip_quoted_string(text, value_sig)?;
            self.preferred_quote = Some(c);
            (
                Value {
                    trivia: Trivia::new(value_pre, ""),
                    text: text[value_sig + 1..end - 1].to_string(),
                    delimiter,
                },
                end,
            )
        } else if c == '{' {
            let end = skip_balanced_block(text, value_sig)?;
            (
                Value {
                    trivia: Trivia::new(value_pre, ""),
                    text: text[value_sig + 1..end - 1].to_string(),
                    delimiter: Delimiter::Computed,
                },
                end,
            )
        } else {
            let end = self.bare_token_end(value_sig);
            if end == value_sig {
                return Err(ParseError::UnexpectedCharacter {
                    offset: value_sig,
                    found: c,
                });
            }
            (
                Value {
                    trivia: Trivia::new(value_pre, ""),
                    text: text[value_sig..end].to_string(),
                    delimiter: Delimiter::Bare,
                },
                end,
            )
        };

        Ok(Entry {
            label,
            value: Some(value),
            raw_span: Span::new(entry_start, end),
            trailing_comma: false,
        })
    }

    fn name_end(&self, from: usize) -> usize {
        self.text[from..]
            .char_indices()
            .find(|(_, c)| !is_name_char(*c))
            .map(|(i, _)| from + i)
            .unwrap_or(self.text.len())
    }

    /// End of a bare (undelimited) attribute value token.
    fn bare_token_end(&self, from: usize) -> usize {
        let bytes = self.text.as_bytes();
        let mut i = from;
        while i < bytes.len() {
            match bytes[i] {
                b' ' | b'\t' | b'\n' | b'\r' | b'>' => break,
                b'/' if bytes.get(i + 1) == Some(&b'>') => break,
                _ => i += 1,
            }
        }
        i
    }

    /// One property: `label`, `label: value`, or `...spread`. Separator
    /// commas are swallowed into the entry's raw span.
    fn parse_object_entry(&mut self, entry_start: usize, sig: usize) -> Result<Entry, ParseError> {
        let text = self.text;
        let pre = &text[entry_start..sig];

        if text[sig..].starts_with("...") {
            let scan_end = self.scan_list(sig, &[',', '}'])?;
            let meat_end = self.meaningful_end(sig, scan_end)?;
            let (raw_end, comma) = self.swallow_comma(scan_end);
            return Ok(Entry {
                label: Label {
                    trivia: Trivia::new(pre, ""),
                    text: None,
                    is_spread: true,
                },
                value: Some(Value {
                    trivia: Trivia::new("", &text[meat_end..scan_end]),
                    text: text[sig..meat_end].to_string(),
                    delimiter: Delimiter::Bare,
                }),
                raw_span: Span::new(entry_start, raw_end),
                trailing_comma: comma,
            });
        }

        let label_end = self.scan_list(sig, &[':', ',', '}'])?;
        let label_meat = self.meaningful_end(sig, label_end)?;
        let label_text = &text[sig..label_meat];
        let label = Label {
            trivia: Trivia::new(pre, &text[label_meat..label_end]),
            text: (!label_text.is_empty()).then(|| label_text.to_string()),
            is_spread: false,
        };

        if text.as_bytes()[label_end] != b':' {
            // Shorthand property (or a stray separator kept for byte
            // coverage): no explicit value.
            let (raw_end, comma) = self.swallow_comma(label_end);
            return Ok(Entry {
                label,
                value: None,
                raw_span: Span::new(entry_start, raw_end),
                trailing_comma: comma,
            });
        }

        let value_start = label_end + 1;
        let value_sig = self.trivia_end(value_start)?;
        let scan_end = self.scan_list(value_sig, &[',', '}'])?;
        let meat_end = self.meaningful_end(value_sig, scan_end)?;
        let segment = &text[value_sig..meat_end];

        let (delimiter, value_text) = self.classify_value(segment);
        let value = Value {
            trivia: Trivia::new(&text[value_start..value_sig], &text[meat_end..scan_end]),
            text: value_text,
            delimiter,
        };
        let (raw_end, comma) = self.swallow_comma(scan_end);
        Ok(Entry {
            label,
            value: Some(value),
            raw_span: Span::new(entry_start, raw_end),
            trailing_comma: comma,
        })
    }

    /// Split a value segment into delimiter and inner text. Only a
    /// segment that is exactly one quoted string or one brace block gets
    /// a delimiter; anything else stays bare.
    fn classify_value(&mut self, segment: &str) -> (Delimiter, String) {
        let first = segment.chars().next();
        if let Some(c) = first
            && is_quote_char(c)
            && skip_quoted_string(segment, 0) == Ok(segment.len())
        {
            self.preferred_quote = Some(c);
            if let Some(delimiter) = Delimiter::from_quote(c) {
                return (delimiter, segment[1..segment.len() - 1].to_string());
            }
        }
        if first == Some('{') && skip_balanced_block(segment, 0) == Ok(segment.len()) {
            return (Delimiter::Computed, segment[1..segment.len() - 1].to_string());
        }
        (Delimiter::Bare, segment.to_string())
    }

    /// Offset just past the last significant byte in `[from, to)`,
    /// leaving trailing whitespace and comments behind.
    fn meaningful_end(&self, from: usize, to: usize) -> Result<usize, ParseError> {
        let bytes = self.text.as_bytes();
        let mut i = from;
        let mut end = from;
        while i < to {
            match bytes[i] {
                b' ' | b'\t' | b'\n' | b'\r' => i += 1,
                b'/' if is_comment_start(self.text, i) => {
                    i = skip_comment(self.text, i)?;
                }
                b'"' | b'\'' | b'`' => {
                    i = skip_quoted_string(self.text, i)?;
                    end = i;
                }
                b'(' | b'[' | b'{' => {
                    i = skip_balanced_block(self.text, i)?;
                    end = i;
                }
                _ => {
                    i += 1;
                    end = i;
                }
            }
        }
        Ok(end.min(to))
    }

    /// Include a separator comma at `at` in the entry's raw span.
    fn swallow_comma(&self, at: usize) -> (usize, bool) {
        if self.text.as_bytes().get(at) == Some(&b',') {
            (at + 1, true)
        } else {
            (at, false)
        }
    }
}

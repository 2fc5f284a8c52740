//! Rebuilding source text from a parsed list and an edit set.
//!
//! `build_text` is a single linear fold over the entries in their final
//! order. It is infallible: no scanning happens here, out-of-range edit
//! indices are ignored, and an empty edit set reproduces the original
//! text byte for byte.

use proplist_parse::{Delimiter, Entry, EntryList, ListKind, Trivia, Value};
use tracing::debug;

use crate::{EditSet, EntryPatch, NewEntry, SerializationContext, ValueKind, ValuePatch};

/// The rebuilt document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltText {
    pub text: String,
    /// Offset just past the rebuilt list's closing terminator, where the
    /// editor cursor lands after the write-back.
    pub cursor_offset: usize,
}

/// One rebuilt entry, pre-concatenation.
struct Chunk {
    text: String,
    has_comma: bool,
    is_content: bool,
    /// Byte length of the trailing trivia, where a separator comma is
    /// inserted when one becomes necessary. Keeping the comma ahead of
    /// the trivia stops it from landing inside a `//` comment.
    comma_back: usize,
}

/// Apply `edits` to the parsed `list` and splice the rebuilt interior
/// back into `original`.
pub fn build_text(
    original: &str,
    list: &EntryList,
    edits: &EditSet,
    ctx: &SerializationContext,
) -> BuiltText {
    let order: Vec<usize> = match &edits.order {
        Some(order) => order
            .iter()
            .copied()
            .filter(|i| *i < list.entries.len())
            .collect(),
        None => (0..list.entries.len()).collect(),
    };

    let mut chunks: Vec<Chunk> = Vec::with_capacity(order.len());
    let mut template_entry: Option<&Entry> = None;
    for idx in order {
        if edits.removed.contains(&idx) {
            continue;
        }
        let entry = &list.entries[idx];
        let chunk = match edits.patches.get(&idx) {
            Some(patch) if !entry.is_trivia_only() => {
                render_patched(original, list.kind, entry, patch, ctx)
            }
            _ => Chunk {
                text: entry.raw(original).to_string(),
                has_comma: entry.trailing_comma,
                is_content: !entry.is_trivia_only(),
                comma_back: trailing_trivia_len(entry),
            },
        };
        if chunk.is_content {
            template_entry = Some(entry);
        }
        chunks.push(chunk);
    }

    if list.kind == ListKind::ObjectLiteral
        && let Some(last) = chunks.iter().rposition(|c| c.is_content)
    {
        // Re-establish separator commas: every content chunk followed by
        // another needs one, and so does the last when entries are being
        // appended after it. A mid-list chunk that gains a comma also
        // sheds its trailing whitespace; the next entry's leading trivia
        // already provides the separation.
        for chunk in &mut chunks[..last] {
            if chunk.is_content && !chunk.has_comma {
                insert_comma(chunk);
                let trimmed = chunk.text.trim_end().len();
                // a `//` comment keeps its terminating newline
                if !ends_in_line_comment(&chunk.text[..trimmed]) {
                    chunk.text.truncate(trimmed);
                }
            }
        }
        if !edits.additions.is_empty() && !chunks[last].has_comma {
            insert_comma(&mut chunks[last]);
        }
    }

    let mut interior: String = chunks.into_iter().map(|c| c.text).collect();

    if !edits.additions.is_empty() {
        let (label_pre, value_pre) = addition_templates(template_entry, list.kind);
        let (mut body, mut tail) = split_trailing_whitespace(interior);
        // A final line comment must stay terminated; unless the
        // indentation template supplies a newline anyway, keep the
        // comment's newline with the body so additions land after it.
        if ends_in_line_comment(&body)
            && !label_pre.starts_with('\n')
            && let Some(rest) = tail.strip_prefix('\n')
        {
            body.push('\n');
            tail = rest.to_string();
        }
        for (i, addition) in edits.additions.iter().enumerate() {
            if list.kind == ListKind::ObjectLiteral && i > 0 {
                body.push(',');
            }
            body.push_str(&label_pre);
            body.push_str(&render_addition(addition, list.kind, ctx, &value_pre));
        }
        body.push_str(&tail);
        interior = body;
    }

    let prefix = &original[..list.entries_start];
    let suffix = &original[list.entries_end + list.terminator.len()..];
    let mut text =
        String::with_capacity(prefix.len() + interior.len() + list.terminator.len() + suffix.len());
    text.push_str(prefix);
    text.push_str(&interior);
    text.push_str(list.terminator.as_str());
    let cursor_offset = text.len();
    text.push_str(suffix);

    debug!(
        cursor_offset,
        removed = edits.removed.len(),
        patched = edits.patches.len(),
        added = edits.additions.len(),
        "rebuilt entry list"
    );
    BuiltText {
        text,
        cursor_offset,
    }
}

fn separator(kind: ListKind) -> char {
    match kind {
        ListKind::Tag => '=',
        ListKind::ObjectLiteral => ':',
    }
}

fn render_patched(
    original: &str,
    kind: ListKind,
    entry: &Entry,
    patch: &EntryPatch,
    ctx: &SerializationContext,
) -> Chunk {
    // Spread and computed pseudo-entries take no label/value patch.
    let Some(name) = patch.label.as_deref().or(entry.name()) else {
        return Chunk {
            text: entry.raw(original).to_string(),
            has_comma: entry.trailing_comma,
            is_content: true,
            comma_back: trailing_trivia_len(entry),
        };
    };

    let mut out = String::new();
    out.push_str(&entry.label.trivia.pre);
    out.push_str(name);

    if let (Some(ValuePatch::Bool(true)), ListKind::Tag) = (&patch.value, kind) {
        // implicit-true shorthand
        return Chunk {
            text: out,
            has_comma: false,
            is_content: true,
            comma_back: 0,
        };
    }

    let mut comma_back = 0;
    match &patch.value {
        None => {
            // Label-only patch: reproduce the existing value verbatim.
            if let Some(value) = &entry.value {
                out.push_str(&entry.label.trivia.post);
                out.push(separator(kind));
                push_existing_value(&mut out, value);
                comma_back = value.trivia.post.len();
            }
        }
        Some(ValuePatch::Bool(flag)) => {
            out.push_str(&entry.label.trivia.post);
            out.push(separator(kind));
            let trivia = value_trivia(entry, kind);
            out.push_str(&trivia.pre);
            match kind {
                // Explicit computed form: omitting the attribute would
                // read as unset, not false.
                ListKind::Tag => {
                    out.push('{');
                    out.push_str(if *flag { "true" } else { "false" });
                    out.push('}');
                }
                ListKind::ObjectLiteral => {
                    out.push_str(if *flag { "true" } else { "false" });
                }
            }
            out.push_str(&trivia.post);
            comma_back = trivia.post.len();
        }
        Some(ValuePatch::Text { text, delimiter }) => {
            out.push_str(&entry.label.trivia.post);
            out.push(separator(kind));
            let delimiter = delimiter
                .or_else(|| entry.value.as_ref().map(|v| v.delimiter))
                .unwrap_or_else(|| inferred_delimiter(kind, text, ctx));
            let trivia = value_trivia(entry, kind);
            out.push_str(&trivia.pre);
            push_value(&mut out, text, delimiter);
            out.push_str(&trivia.post);
            comma_back = trivia.post.len();
        }
    }

    let mut has_comma = false;
    if entry.trailing_comma {
        out.push(',');
        has_comma = true;
    }
    Chunk {
        text: out,
        has_comma,
        is_content: true,
        comma_back,
    }
}

/// Byte length of the trivia at the end of the entry's raw span
/// (excluding any separator comma).
fn trailing_trivia_len(entry: &Entry) -> usize {
    match &entry.value {
        Some(value) => value.trivia.post.len(),
        None => entry.label.trivia.post.len(),
    }
}

/// The entry's value trivia, or the context's conventional spacing when
/// the entry was shorthand.
fn value_trivia(entry: &Entry, kind: ListKind) -> Trivia {
    entry
        .value
        .as_ref()
        .map(|v| v.trivia.clone())
        .unwrap_or_else(|| match kind {
            ListKind::Tag => Trivia::default(),
            ListKind::ObjectLiteral => Trivia::new(" ", ""),
        })
}

fn push_existing_value(out: &mut String, value: &Value) {
    out.push_str(&value.trivia.pre);
    out.push_str(value.delimiter.open());
    out.push_str(&value.text);
    out.push_str(value.delimiter.close());
    out.push_str(&value.trivia.post);
}

/// Render new value text, escaping the delimiter's quote character.
fn push_value(out: &mut String, text: &str, delimiter: Delimiter) {
    out.push_str(delimiter.open());
    match delimiter.quote_char() {
        Some(quote) => out.push_str(&escape_quote(text, quote)),
        None => out.push_str(text),
    }
    out.push_str(delimiter.close());
}

/// Backslash-escape unescaped occurrences of `quote` in `text`.
fn escape_quote(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut backslashes = 0usize;
    for c in text.chars() {
        if c == quote && backslashes % 2 == 0 {
            out.push('\\');
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }
        out.push(c);
    }
    out
}

/// The delimiter for value text that arrives without one.
fn inferred_delimiter(kind: ListKind, text: &str, ctx: &SerializationContext) -> Delimiter {
    match ValueKind::infer(text, Delimiter::Bare) {
        ValueKind::Any | ValueKind::String | ValueKind::Enum(_) => ctx.quote_delimiter(),
        _ => match kind {
            ListKind::Tag => Delimiter::Computed,
            ListKind::ObjectLiteral => Delimiter::Bare,
        },
    }
}

/// Indentation and value-spacing templates for appended entries, taken
/// from the last surviving content entry.
fn addition_templates(entry: Option<&Entry>, kind: ListKind) -> (String, String) {
    let label_pre = entry
        .map(|e| e.label.trivia.indentation().to_string())
        .filter(|pre| !pre.is_empty())
        .unwrap_or_else(|| " ".to_string());
    let value_pre = entry
        .and_then(|e| e.value.as_ref())
        .map(|v| v.trivia.pre.clone())
        .filter(|pre| pre.chars().all(char::is_whitespace))
        .unwrap_or_else(|| match kind {
            ListKind::Tag => String::new(),
            ListKind::ObjectLiteral => " ".to_string(),
        });
    (label_pre, value_pre)
}

fn render_addition(
    new: &NewEntry,
    kind: ListKind,
    ctx: &SerializationContext,
    value_pre: &str,
) -> String {
    let (text, delimiter) = match &new.value {
        Some(value) => {
            let delimiter = new.delimiter.unwrap_or_else(|| {
                match new
                    .kind
                    .clone()
                    .unwrap_or_else(|| ValueKind::infer(value, Delimiter::Bare))
                {
                    ValueKind::Any | ValueKind::String | ValueKind::Enum(_) => {
                        ctx.quote_delimiter()
                    }
                    _ => Delimiter::Bare,
                }
            });
            (value.clone(), delimiter)
        }
        None => {
            let (text, delimiter) = new
                .kind
                .clone()
                .unwrap_or(ValueKind::Any)
                .default_value(ctx);
            (text, new.delimiter.unwrap_or(delimiter))
        }
    };
    // Tag values are either quoted strings or brace-wrapped expressions.
    let delimiter = if kind == ListKind::Tag && delimiter == Delimiter::Bare {
        Delimiter::Computed
    } else {
        delimiter
    };

    let mut out = String::new();
    match &new.label {
        Some(name) => {
            out.push_str(name);
            out.push(separator(kind));
            out.push_str(value_pre);
            push_value(&mut out, &text, delimiter);
        }
        None => match kind {
            ListKind::Tag => {
                out.push('{');
                out.push_str(&text);
                out.push('}');
            }
            ListKind::ObjectLiteral => out.push_str(&text),
        },
    }
    out
}

fn insert_comma(chunk: &mut Chunk) {
    let at = chunk.text.len() - chunk.comma_back.min(chunk.text.len());
    chunk.text.insert(at, ',');
    chunk.has_comma = true;
}

fn split_trailing_whitespace(interior: String) -> (String, String) {
    let cut = interior
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let tail = interior[cut..].to_string();
    let mut body = interior;
    body.truncate(cut);
    (body, tail)
}

/// Whether the last line of `body` ends inside a `//` comment.
fn ends_in_line_comment(body: &str) -> bool {
    let line = body.rsplit('\n').next().unwrap_or(body);
    let bytes = line.as_bytes();
    let mut in_quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        match (in_quote, bytes[i]) {
            (Some(q), b) if b == q => in_quote = None,
            (Some(_), b'\\') => i += 1,
            (None, b @ (b'"' | b'\'' | b'`')) => in_quote = Some(b),
            (None, b'/') if bytes.get(i + 1) == Some(&b'/') => return true,
            _ => {}
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use proplist_parse::{parse_object_at, parse_tag_at};

    fn tag_list(text: &str) -> EntryList {
        parse_tag_at(text, text.len() - 1).unwrap()
    }

    fn object_list(text: &str) -> EntryList {
        parse_object_at(text, 1).unwrap()
    }

    #[test]
    fn empty_edit_set_is_identity() {
        for text in [
            "<View a=\"1\" b={x} {...rest}>",
            "<Spacer  size={4}\n/>",
            "{ a: 1, // note\n b: 'x' }",
        ] {
            let list = if text.starts_with('<') {
                tag_list(text)
            } else {
                object_list(text)
            };
            let edits = EditSet::new();
            let built = build_text(text, &list, &edits, &SerializationContext::default());
            assert_eq!(built.text, text);
        }
    }

    #[test]
    fn patch_string_value_keeps_quote_style() {
        let text = "<T name='Hello' other={1}>";
        let list = tag_list(text);
        let mut edits = EditSet::new();
        edits.set_value(0, "World");
        let ctx = SerializationContext::for_list(&list);
        let built = build_text(text, &list, &edits, &ctx);
        assert_eq!(built.text, "<T name='World' other={1}>");
    }

    #[test]
    fn patch_escapes_new_quotes() {
        let text = "<T label=\"x\">";
        let list = tag_list(text);
        let mut edits = EditSet::new();
        edits.set_value(0, "say \"hi\"");
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "<T label=\"say \\\"hi\\\"\">");
    }

    #[test]
    fn bool_true_collapses_to_shorthand() {
        let text = "<T disabled={false} x=\"1\">";
        let list = tag_list(text);
        let mut edits = EditSet::new();
        edits.set_bool(0, true);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "<T disabled x=\"1\">");
    }

    #[test]
    fn bool_false_is_explicit() {
        let text = "<T on>";
        let list = tag_list(text);
        let mut edits = EditSet::new();
        edits.set_bool(0, false);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "<T on={false}>");
    }

    #[test]
    fn bool_in_object_is_bare() {
        let text = "{ visible: false }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.set_bool(0, true);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ visible: true }");
    }

    #[test]
    fn rename_keeps_value_bytes() {
        let text = "{ a : { x: 1 } /* keep */, b: 2 }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.rename(0, "outer");
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ outer : { x: 1 } /* keep */, b: 2 }");
    }

    #[test]
    fn removal_drops_trivia_too() {
        let text = "{ a: 1, b: 2 }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.remove(0);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ b: 2 }");
    }

    #[test]
    fn reorder_reestablishes_commas() {
        let text = "{ a: 1, b: 2 }";
        let list = object_list(text);
        // b's raw span carries the space before `}`; a keeps its comma
        let mut edits = EditSet::new();
        edits.reorder(vec![1, 0]);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ b: 2, a: 1,}");
    }

    #[test]
    fn reorder_folds_displaced_whitespace() {
        // the moved entry's trailing space must not pile up against the
        // next entry's leading space
        let text = "{ a: 1, b: 2, c: 3 }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.reorder(vec![2, 0, 1]);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ c: 3, a: 1, b: 2,}");
        assert!(!built.text.contains("  "));
    }

    #[test]
    fn reorder_keeps_block_comment_ahead_of_comma() {
        let text = "{ b: 2 /* k */, a: 1 }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.reorder(vec![1, 0]);
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{ a: 1, b: 2 /* k */,}");
    }

    #[test]
    fn append_to_object_displaces_closing_space() {
        let text = "{ a: 1, // note\n b: 'x' }";
        let list = object_list(text);
        let ctx = SerializationContext::for_list(&list);
        let mut edits = EditSet::new();
        edits.add(NewEntry::named("color").with_value("#fff"));
        let built = build_text(text, &list, &edits, &ctx);
        assert_eq!(built.text, "{ a: 1, // note\n b: 'x', color: '#fff' }");
        assert_eq!(built.cursor_offset, built.text.len());
    }

    #[test]
    fn append_after_final_line_comment_starts_new_line() {
        let text = "{\n  a: 1 // last\n}";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.add(NewEntry::named("b").with_value("2"));
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "{\n  a: 1, // last\n  b: 2\n}");
    }

    #[test]
    fn append_to_empty_tag() {
        let text = "<Empty>rest</Empty>";
        let list = parse_tag_at(text, 3).unwrap();
        let mut edits = EditSet::new();
        edits.add(NewEntry::named("title").with_kind(ValueKind::String));
        edits.add(NewEntry::named("count").with_kind(ValueKind::Number));
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "<Empty title=\"\" count={0}>rest</Empty>");
        assert_eq!(
            built.cursor_offset,
            built.text.find(">rest").unwrap() + 1
        );
    }

    #[test]
    fn append_spread() {
        let text = "<V a=\"1\">";
        let list = tag_list(text);
        let mut edits = EditSet::new();
        edits.add(NewEntry::spread("...rest"));
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, "<V a=\"1\" {...rest}>");
    }

    #[test]
    fn out_of_range_indices_are_ignored() {
        let text = "{ a: 1 }";
        let list = object_list(text);
        let mut edits = EditSet::new();
        edits.remove(9);
        edits.set_value(7, "zzz");
        let built = build_text(text, &list, &edits, &SerializationContext::default());
        assert_eq!(built.text, text);
    }

    #[test]
    fn cursor_lands_past_terminator() {
        let text = "before <X a=\"1\" /> after";
        let list = parse_tag_at(text, 10).unwrap();
        let built = build_text(text, &list, &EditSet::new(), &SerializationContext::default());
        assert_eq!(built.cursor_offset, text.find("/>").unwrap() + 2);
        assert_eq!(&built.text[built.cursor_offset..], " after");
    }
}

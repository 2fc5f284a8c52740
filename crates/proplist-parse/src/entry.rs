//! The span-exact entry data model.

use proplist_scan::Span;

/// Whitespace and comments immediately surrounding a text fragment.
///
/// For a label, `pre + text + post` reproduces the label's slice of the
/// source; for a value, the delimiters sit between `pre` and `text` (see
/// [`Value`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trivia {
    /// Whitespace and comments before the fragment.
    pub pre: String,
    /// Whitespace and comments after the fragment.
    pub post: String,
}

impl Trivia {
    pub fn new(pre: impl Into<String>, post: impl Into<String>) -> Self {
        Self {
            pre: pre.into(),
            post: post.into(),
        }
    }

    /// The leading whitespace of `pre`, up to the first comment.
    ///
    /// This is the indentation template used when appending new entries:
    /// for `"  // note\n  "` it yields `"  "`, for `"\n    "` the whole
    /// string.
    pub fn indentation(&self) -> &str {
        let end = self
            .pre
            .find(|c: char| !c.is_whitespace())
            .unwrap_or(self.pre.len());
        &self.pre[..end]
    }
}

/// The character(s) wrapping a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `"…"`
    Double,
    /// `'…'`
    Single,
    /// `` `…` ``
    Backtick,
    /// `{…}` — a computed expression.
    Computed,
    /// No delimiter: a bare token, or boolean shorthand.
    Bare,
}

impl Delimiter {
    /// The delimiter for a quote character, if `c` is one.
    pub fn from_quote(c: char) -> Option<Self> {
        match c {
            '"' => Some(Delimiter::Double),
            '\'' => Some(Delimiter::Single),
            '`' => Some(Delimiter::Backtick),
            _ => None,
        }
    }

    /// The opening text of this delimiter.
    pub fn open(&self) -> &'static str {
        match self {
            Delimiter::Double => "\"",
            Delimiter::Single => "'",
            Delimiter::Backtick => "`",
            Delimiter::Computed => "{",
            Delimiter::Bare => "",
        }
    }

    /// The closing text of this delimiter.
    pub fn close(&self) -> &'static str {
        match self {
            Delimiter::Computed => "}",
            _ => self.open(),
        }
    }

    /// The quote character, for the three quote delimiters.
    pub fn quote_char(&self) -> Option<char> {
        match self {
            Delimiter::Double => Some('"'),
            Delimiter::Single => Some('\''),
            Delimiter::Backtick => Some('`'),
            _ => None,
        }
    }
}

/// The name side of an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    /// Whitespace and comments around the name.
    pub trivia: Trivia,
    /// The name text. `None` for comment-only, trivia-only, and
    /// pure-spread entries.
    pub text: Option<String>,
    /// Whether this entry is a spread expression (`...rest` or
    /// `{...rest}`).
    pub is_spread: bool,
}

/// The value side of an entry.
///
/// `trivia.pre + delimiter.open() + text + delimiter.close() +
/// trivia.post` reproduces the value's slice of the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    /// Whitespace and comments around the delimited value.
    pub trivia: Trivia,
    /// The value text, without delimiters. For `Computed` values this is
    /// the brace body, inner padding included.
    pub text: String,
    /// The delimiter wrapping the value.
    pub delimiter: Delimiter,
}

/// One attribute (tag context) or one property (object-literal context).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub label: Label,
    /// `None` for boolean-shorthand attributes, shorthand properties,
    /// and pseudo-entries.
    pub value: Option<Value>,
    /// Original byte offsets; `raw_span.slice(text)` reproduces the
    /// entry verbatim, separator comma included.
    pub raw_span: Span,
    /// Whether `raw_span` ends with a separator comma (object context).
    pub trailing_comma: bool,
}

impl Entry {
    /// The entry's verbatim slice of the original source.
    pub fn raw<'a>(&self, text: &'a str) -> &'a str {
        self.raw_span.slice(text)
    }

    /// The entry's name, when it has one.
    pub fn name(&self) -> Option<&str> {
        self.label.text.as_deref()
    }

    /// Whether this entry carries no name and no value (comments or
    /// trailing trivia captured for byte coverage).
    pub fn is_trivia_only(&self) -> bool {
        self.label.text.is_none() && !self.label.is_spread && self.value.is_none()
    }
}

/// The kind of list an [`EntryList`] was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// A JSX tag's attributes.
    Tag,
    /// An object literal's properties.
    ObjectLiteral,
}

/// The closing terminator of an entry list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terminator {
    /// `>`
    AngleClose,
    /// `/>`
    SelfClose,
    /// `}`
    CloseBrace,
}

impl Terminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Terminator::AngleClose => ">",
            Terminator::SelfClose => "/>",
            Terminator::CloseBrace => "}",
        }
    }

    pub fn len(&self) -> usize {
        self.as_str().len()
    }
}

/// The ordered, span-exact parse result for one tag's attributes or one
/// object literal's properties.
///
/// Created fresh on every parse, immutable once returned, and discarded
/// after serialization. Invariant: the concatenation of all entries'
/// `raw_span` slices equals `text[entries_start..entries_end]` exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryList {
    pub kind: ListKind,
    /// The tag name for attribute lists, `None` for object literals.
    pub owner_name: Option<String>,
    /// Offset of the first byte of the entry region (just past the `{`,
    /// or just past the tag name).
    pub entries_start: usize,
    /// Offset of the closing terminator.
    pub entries_end: usize,
    /// The closing terminator that ended the list.
    pub terminator: Terminator,
    /// Entries in source order.
    pub entries: Vec<Entry>,
    /// The last string-quote character observed while parsing, if any.
    /// This is the per-document quote convention the serializer uses for
    /// new string values.
    pub preferred_quote: Option<char>,
}

impl EntryList {
    /// The list's interior: everything between the opener and the
    /// closing terminator.
    pub fn interior<'a>(&self, text: &'a str) -> &'a str {
        &text[self.entries_start..self.entries_end]
    }

    /// Entries that carry a name.
    pub fn named_entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.label.text.is_some())
    }

    /// Find a named entry by attribute/property name.
    pub fn entry_named(&self, name: &str) -> Option<(usize, &Entry)> {
        self.entries
            .iter()
            .enumerate()
            .find(|(_, e)| e.name() == Some(name))
    }
}

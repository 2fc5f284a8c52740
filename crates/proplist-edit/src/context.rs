//! Serialization settings threaded through `build_text`.

use proplist_parse::{Delimiter, EntryList};

/// Immutable settings for serializing new and patched values.
///
/// Built once per edit session, normally from the parsed list's observed
/// quote convention, and passed explicitly to every serialization call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializationContext {
    /// The quote character for new string values.
    pub default_quote: char,
}

impl Default for SerializationContext {
    fn default() -> Self {
        Self { default_quote: '"' }
    }
}

impl SerializationContext {
    /// Adopt the quote convention the parser observed in `list`, falling
    /// back to double quotes.
    pub fn for_list(list: &EntryList) -> Self {
        Self {
            default_quote: list.preferred_quote.unwrap_or('"'),
        }
    }

    /// The string delimiter matching [`Self::default_quote`].
    pub fn quote_delimiter(&self) -> Delimiter {
        Delimiter::from_quote(self.default_quote).unwrap_or(Delimiter::Double)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proplist_parse::{ListKind, parse_entries};

    #[test]
    fn adopts_observed_quote() {
        let list = parse_entries("{ a: 'x' }", 1, ListKind::ObjectLiteral).unwrap();
        assert_eq!(SerializationContext::for_list(&list).default_quote, '\'');
        assert_eq!(
            SerializationContext::for_list(&list).quote_delimiter(),
            Delimiter::Single
        );

        let list = parse_entries("{ a: 1 }", 1, ListKind::ObjectLiteral).unwrap();
        assert_eq!(SerializationContext::for_list(&list).default_quote, '"');
    }
}

//! Value classification and per-kind defaults.

use proplist_parse::Delimiter;

use crate::SerializationContext;

/// The declared or inferred type of an attribute/property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueKind {
    /// Unknown or unconstrained; treated as a string.
    Any,
    String,
    Number,
    Bool,
    Function,
    Object,
    Array,
    /// One of a fixed set of string variants.
    Enum(Vec<String>),
    /// An object with a known property layout.
    Shape,
}

impl ValueKind {
    /// The default value text and delimiter for a freshly added entry of
    /// this kind.
    ///
    /// The delimiter is `Bare` for expression-valued kinds; in tag
    /// context the serializer wraps bare expressions in `{…}`.
    pub fn default_value(&self, ctx: &SerializationContext) -> (String, Delimiter) {
        match self {
            ValueKind::Any | ValueKind::String => (String::new(), ctx.quote_delimiter()),
            ValueKind::Enum(variants) => (
                variants.first().cloned().unwrap_or_default(),
                ctx.quote_delimiter(),
            ),
            ValueKind::Number => ("0".to_string(), Delimiter::Bare),
            ValueKind::Bool => ("true".to_string(), Delimiter::Bare),
            ValueKind::Function => ("() => null".to_string(), Delimiter::Bare),
            ValueKind::Object | ValueKind::Shape => ("{  }".to_string(), Delimiter::Bare),
            ValueKind::Array => ("[ ]".to_string(), Delimiter::Bare),
        }
    }

    /// Classify an existing value by its text and delimiter.
    pub fn infer(text: &str, delimiter: Delimiter) -> ValueKind {
        if delimiter.quote_char().is_some() {
            return ValueKind::String;
        }
        let text = text.trim();
        if text == "true" || text == "false" {
            return ValueKind::Bool;
        }
        if text.starts_with('{') {
            return ValueKind::Object;
        }
        if text.starts_with('[') {
            return ValueKind::Array;
        }
        if is_numeric_literal(text) {
            return ValueKind::Number;
        }
        if text.starts_with("function") || text.contains("=>") {
            return ValueKind::Function;
        }
        ValueKind::Any
    }
}

/// A decimal literal with optional sign and fraction, or a `0x` hex
/// literal.
fn is_numeric_literal(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if digits.is_empty() {
        return false;
    }
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    digits != "."
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn infers_from_text_and_delimiter() {
        assert_eq!(ValueKind::infer("hello", Delimiter::Double), ValueKind::String);
        assert_eq!(ValueKind::infer("false", Delimiter::Computed), ValueKind::Bool);
        assert_eq!(ValueKind::infer("{ a: 1 }", Delimiter::Bare), ValueKind::Object);
        assert_eq!(ValueKind::infer("[1, 2]", Delimiter::Bare), ValueKind::Array);
        assert_eq!(ValueKind::infer("42", Delimiter::Bare), ValueKind::Number);
        assert_eq!(ValueKind::infer("-3.5", Delimiter::Computed), ValueKind::Number);
        assert_eq!(ValueKind::infer("0xFF", Delimiter::Bare), ValueKind::Number);
        assert_eq!(
            ValueKind::infer("() => go()", Delimiter::Computed),
            ValueKind::Function
        );
        assert_eq!(
            ValueKind::infer("function handle() {}", Delimiter::Computed),
            ValueKind::Function
        );
        assert_eq!(ValueKind::infer("someRef", Delimiter::Computed), ValueKind::Any);
    }

    #[test]
    fn rejects_malformed_numbers() {
        assert!(!is_numeric_literal("1.2.3"));
        assert!(!is_numeric_literal("."));
        assert!(!is_numeric_literal(""));
        assert!(!is_numeric_literal("0x"));
        assert!(!is_numeric_literal("12px"));
    }

    #[test]
    fn kind_defaults() {
        let ctx = SerializationContext::default();
        assert_eq!(
            ValueKind::Bool.default_value(&ctx),
            ("true".to_string(), Delimiter::Bare)
        );
        assert_eq!(
            ValueKind::Function.default_value(&ctx),
            ("() => null".to_string(), Delimiter::Bare)
        );
        assert_eq!(
            ValueKind::Shape.default_value(&ctx),
            ("{  }".to_string(), Delimiter::Bare)
        );
        assert_eq!(
            ValueKind::String.default_value(&ctx),
            (String::new(), Delimiter::Double)
        );
        let kind = ValueKind::Enum(vec!["solid".to_string(), "outline".to_string()]);
        assert_eq!(
            kind.default_value(&ctx),
            ("solid".to_string(), Delimiter::Double)
        );
    }
}

//! Scan-level errors.

/// A failure while scanning for the end of a string, comment, or block.
///
/// Every variant is terminal for the operation that produced it; nothing
/// is retried. Offsets are byte offsets into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A quoted string has no unescaped closing quote before end of text.
    UnterminatedString {
        /// Offset of the opening quote.
        start: usize,
        /// The quote character that opened the string.
        quote: char,
    },
    /// A block comment is never closed by `*/`.
    UnterminatedComment {
        /// Offset of the `/*`.
        start: usize,
    },
    /// A bracket block reaches end of text with unmatched openers.
    UnbalancedBracket {
        /// Offset of the opening bracket.
        start: usize,
        /// The opening bracket character.
        open: char,
    },
    /// None of the target characters occur unnested after the start.
    ScanNotFound {
        /// Offset the scan started from.
        from: usize,
        /// The characters that were searched for.
        targets: String,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::UnterminatedString { start, quote } => {
                write!(f, "cannot find end quote {quote} for string starting at offset {start}")
            }
            ScanError::UnterminatedComment { start } => {
                write!(f, "block comment starting at offset {start} is never closed")
            }
            ScanError::UnbalancedBracket { start, open } => {
                write!(f, "cannot find closing bracket for {open} at offset {start}")
            }
            ScanError::ScanNotFound { from, targets } => {
                write!(f, "none of {targets:?} found after offset {from}")
            }
        }
    }
}

impl std::error::Error for ScanError {}

//! Locate- and parse-level errors.

use proplist_scan::ScanError;

/// A failure while locating the enclosing tag or object literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// No tag starts at or before the cursor offset.
    NoEnclosingTag { offset: usize },
    /// No brace span contains the cursor offset.
    NoEnclosingObject { offset: usize },
    /// Indexing the document failed mid-scan.
    Scan(ScanError),
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocateError::NoEnclosingTag { offset } => {
                write!(f, "no enclosing tag found at offset {offset}")
            }
            LocateError::NoEnclosingObject { offset } => {
                write!(f, "no enclosing object literal found at offset {offset}")
            }
            LocateError::Scan(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for LocateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LocateError::Scan(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScanError> for LocateError {
    fn from(err: ScanError) -> Self {
        LocateError::Scan(err)
    }
}

/// A failure while parsing an entry list.
///
/// Parsing is all-or-nothing: on any error the partial result is
/// discarded and no edit may be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// End of text was reached without the list's closing terminator.
    UnterminatedEntryList { start: usize },
    /// A character that cannot begin an entry.
    UnexpectedCharacter { offset: usize, found: char },
    /// A scan primitive failed inside the list.
    Scan(ScanError),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::UnterminatedEntryList { start } => {
                write!(f, "entry list starting at offset {start} is never closed")
            }
            ParseError::UnexpectedCharacter { offset, found } => {
                write!(f, "unexpected character {found:?} at offset {offset}")
            }
            ParseError::Scan(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Scan(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ScanError> for ParseError {
    fn from(err: ScanError) -> Self {
        ParseError::Scan(err)
    }
}

/// Umbrella error for the cursor-level operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    Locate(LocateError),
    Parse(ParseError),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Locate(err) => write!(f, "{err}"),
            Error::Parse(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Locate(err) => Some(err),
            Error::Parse(err) => Some(err),
        }
    }
}

impl From<LocateError> for Error {
    fn from(err: LocateError) -> Self {
        Error::Locate(err)
    }
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        Error::Parse(err)
    }
}

//! The editor host boundary.
//!
//! Everything the core needs from the surrounding editor goes through
//! [`EditorHost`]; the library never touches an editor directly.

use std::ops::Range;

/// A failure reported by the editor host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    message: String,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HostError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "editor host error: {}", self.message)
    }
}

impl std::error::Error for HostError {}

/// The document and cursor operations an editor must provide.
pub trait EditorHost {
    /// The full document text.
    fn get_value(&self) -> Result<String, HostError>;
    /// The cursor position as a byte offset into the document.
    fn get_cursor(&self) -> Result<usize, HostError>;
    /// Replace the full document text.
    fn set_value(&mut self, text: &str) -> Result<(), HostError>;
    /// Move the cursor to a byte offset.
    fn set_cursor(&mut self, offset: usize) -> Result<(), HostError>;
    /// Replace the current selection (or insert at the cursor when
    /// nothing is selected).
    fn replace_selection(&mut self, text: &str) -> Result<(), HostError>;
}

/// A plain in-memory host for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    pub value: String,
    pub cursor: usize,
    pub selection: Option<Range<usize>>,
}

impl InMemoryHost {
    pub fn new(value: impl Into<String>, cursor: usize) -> Self {
        Self {
            value: value.into(),
            cursor,
            selection: None,
        }
    }
}

impl EditorHost for InMemoryHost {
    fn get_value(&self) -> Result<String, HostError> {
        Ok(self.value.clone())
    }

    fn get_cursor(&self) -> Result<usize, HostError> {
        Ok(self.cursor)
    }

    fn set_value(&mut self, text: &str) -> Result<(), HostError> {
        self.value = text.to_string();
        Ok(())
    }

    fn set_cursor(&mut self, offset: usize) -> Result<(), HostError> {
        if offset > self.value.len() {
            return Err(HostError::new(format!(
                "cursor offset {offset} is past the end of the document"
            )));
        }
        self.cursor = offset;
        Ok(())
    }

    fn replace_selection(&mut self, text: &str) -> Result<(), HostError> {
        let range = self
            .selection
            .clone()
            .unwrap_or(self.cursor..self.cursor);
        if range.end > self.value.len() || range.start > range.end {
            return Err(HostError::new("selection is out of range"));
        }
        self.value.replace_range(range.clone(), text);
        self.cursor = range.start + text.len();
        self.selection = None;
        Ok(())
    }
}

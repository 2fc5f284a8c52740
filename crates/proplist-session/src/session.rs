//! The read → locate → parse → edit → write flow.

use proplist_edit::{BuiltText, EditSet, SerializationContext, build_text};
use proplist_parse::{EntryList, parse_object_at, parse_tag_at};
use tracing::debug;

use crate::{EditorHost, HostError};

/// A session error: either the core failed to locate/parse, or the host
/// refused an operation.
#[derive(Debug)]
pub enum SessionError {
    Core(proplist_parse::Error),
    Host(HostError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::Core(err) => write!(f, "{err}"),
            SessionError::Host(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::Core(err) => Some(err),
            SessionError::Host(err) => Some(err),
        }
    }
}

impl From<proplist_parse::Error> for SessionError {
    fn from(err: proplist_parse::Error) -> Self {
        SessionError::Core(err)
    }
}

impl From<HostError> for SessionError {
    fn from(err: HostError) -> Self {
        SessionError::Host(err)
    }
}

/// One edit round against the document currently in the host.
///
/// Opening a session snapshots the document; nothing is written back
/// until [`commit`](Self::commit), and a failed parse never writes at
/// all.
#[derive(Debug, Clone)]
pub struct EditSession {
    source: String,
    list: EntryList,
    context: SerializationContext,
}

impl EditSession {
    /// Open a session on the tag enclosing the host's cursor.
    pub fn open_tag(host: &dyn EditorHost) -> Result<Self, SessionError> {
        Self::open_with(host, |source, cursor| parse_tag_at(source, cursor))
    }

    /// Open a session on the object literal enclosing the host's cursor.
    pub fn open_object(host: &dyn EditorHost) -> Result<Self, SessionError> {
        Self::open_with(host, |source, cursor| parse_object_at(source, cursor))
    }

    fn open_with(
        host: &dyn EditorHost,
        parse: impl FnOnce(&str, usize) -> Result<EntryList, proplist_parse::Error>,
    ) -> Result<Self, SessionError> {
        let source = host.get_value()?;
        let cursor = host.get_cursor()?;
        let list = parse(&source, cursor)?;
        let context = SerializationContext::for_list(&list);
        debug!(
            cursor,
            entries = list.entries.len(),
            owner = list.owner_name.as_deref().unwrap_or("<object>"),
            "opened edit session"
        );
        Ok(Self {
            source,
            list,
            context,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn list(&self) -> &EntryList {
        &self.list
    }

    pub fn context(&self) -> &SerializationContext {
        &self.context
    }

    /// Rebuild the document with `edits` applied, without touching the
    /// host.
    pub fn preview(&self, edits: &EditSet) -> BuiltText {
        build_text(&self.source, &self.list, edits, &self.context)
    }

    /// Apply `edits`, write the result back, and park the cursor just
    /// past the rebuilt list. Returns the new cursor offset.
    pub fn commit(
        &self,
        host: &mut dyn EditorHost,
        edits: &EditSet,
    ) -> Result<usize, SessionError> {
        let built = self.preview(edits);
        host.set_value(&built.text)?;
        host.set_cursor(built.cursor_offset)?;
        debug!(cursor = built.cursor_offset, "committed edit session");
        Ok(built.cursor_offset)
    }
}

/// Insert a text snippet over the host's current selection.
pub fn insert_snippet(host: &mut dyn EditorHost, snippet: &str) -> Result<(), SessionError> {
    host.replace_selection(snippet)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryHost, PropRegistry};
    use proplist_edit::NewEntry;
    use proplist_parse::{Error, LocateError};

    #[test]
    fn tag_session_round_trip() {
        let source = "<Label text='Old' dim>";
        let mut host = InMemoryHost::new(source, 8);
        let session = EditSession::open_tag(&host).unwrap();
        assert_eq!(session.list().owner_name.as_deref(), Some("Label"));

        let mut edits = EditSet::new();
        let (idx, _) = session.list().entry_named("text").unwrap();
        edits.set_value(idx, "New");
        let cursor = session.commit(&mut host, &edits).unwrap();

        assert_eq!(host.value, "<Label text='New' dim>");
        assert_eq!(cursor, host.value.len());
        assert_eq!(host.cursor, cursor);
    }

    #[test]
    fn object_session_adds_from_registry() {
        let source = "const s = { pad: 4 };";
        let cursor = source.find("pad").unwrap();
        let mut host = InMemoryHost::new(source, cursor);
        let session = EditSession::open_object(&host).unwrap();

        let mut registry = PropRegistry::new();
        registry.declare("margin", proplist_edit::ValueKind::Number, false);
        let mut edits = EditSet::new();
        edits.add(registry.new_entry("margin"));
        session.commit(&mut host, &edits).unwrap();

        assert_eq!(host.value, "const s = { pad: 4, margin: 0 };");
        assert_eq!(host.cursor, host.value.len() - 1);
    }

    #[test]
    fn failed_parse_writes_nothing() {
        let source = "no tags here";
        let mut host = InMemoryHost::new(source, 4);
        match EditSession::open_tag(&host) {
            Err(SessionError::Core(Error::Locate(LocateError::NoEnclosingTag { .. }))) => {}
            other => panic!("expected NoEnclosingTag, got {other:?}"),
        }
        // an unterminated list also refuses to open
        host.value = "<View a=\"1\" ".to_string();
        host.cursor = 6;
        assert!(EditSession::open_tag(&host).is_err());
        assert_eq!(host.value, "<View a=\"1\" ");
    }

    #[test]
    fn preview_leaves_host_untouched() {
        let source = "{ a: 1 }";
        let host = InMemoryHost::new(source, 3);
        let session = EditSession::open_object(&host).unwrap();
        let mut edits = EditSet::new();
        edits.add(NewEntry::named("b").with_value("2"));
        let built = session.preview(&edits);
        assert_eq!(built.text, "{ a: 1, b: 2 }");
        assert_eq!(host.value, source);
    }

    #[test]
    fn snippet_goes_through_selection() {
        let mut host = InMemoryHost::new("<View  />", 6);
        insert_snippet(&mut host, "pad={2}").unwrap();
        assert_eq!(host.value, "<View pad={2} />");
    }
}

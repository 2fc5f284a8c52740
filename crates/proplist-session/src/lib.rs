//! Editor integration for proplist.
//!
//! The core crates are pure; this one owns the boundary to a real
//! editor. An [`EditorHost`] supplies the document and cursor, an
//! [`EditSession`] snapshots and parses it, and a committed
//! [`EditSet`](proplist_edit::EditSet) flows back through the host as a
//! full-document write plus a cursor move.

mod host;
mod registry;
mod session;

pub use host::{EditorHost, HostError, InMemoryHost};
pub use registry::{PropRegistry, PropSpec};
pub use session::{EditSession, SessionError, insert_snippet};

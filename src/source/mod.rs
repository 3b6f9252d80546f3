//! Statement sources
//!
//! The extraction core reads the knowledge graph only through the
//! `StatementSource` trait. `OrkgClient` talks to the REST API;
//! `MemorySource` serves a static snapshot.

mod memory;
mod orkg;
mod traits;

pub use memory::{MemorySource, Snapshot};
pub use orkg::OrkgClient;
pub use traits::{SourceError, SourceResult, StatementSource};

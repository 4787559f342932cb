// Primary SQLite store
// Holds fully normalized sessions; the search index is maintained separately.

mod db;
mod error;
mod queries;
mod records;
mod schema;

pub use db::{Database, WRITE_BATCH_SIZE};
pub use error::{Error, Result};
pub use records::{ProjectOverview, ProjectRecord, SessionRecord, SessionSummary};

// FTS5 search index
// Independent of the primary store; rebuildable from it at any time.

mod error;
mod index;

pub use error::{Error, Result};
pub use index::{MAX_SEARCH_RESULTS, SearchDocument, SearchHit, SearchIndex, WRITE_BATCH_SIZE};

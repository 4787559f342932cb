use rusqlite::Connection;
use std::path::Path;

use loghive_types::RenderableMessage;

use crate::queries;
use crate::records::{ProjectOverview, ProjectRecord, SessionRecord, SessionSummary};
use crate::schema;
use crate::Result;

/// Messages per committed transaction during a session write. Long sessions
/// commit in slices instead of one giant transaction; a failed import leaves
/// a committed prefix that the next run upserts over.
pub const WRITE_BATCH_SIZE: usize = 200;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let db = Self { conn };
        schema::init_schema(&db.conn)?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        schema::init_schema(&db.conn)?;
        Ok(db)
    }

    /// Write one session and its messages, idempotently.
    ///
    /// Protocol: upsert project, upsert session by `(project_id,
    /// external_id)`, upsert each message by `(session_id, seq)` with
    /// full-column overwrite, commit every [`WRITE_BATCH_SIZE`] messages,
    /// then delete rows past the highest written seq so a shrunken session
    /// leaves no trailing orphans. Returns the session rowid.
    pub fn write_session(
        &self,
        project: &ProjectRecord,
        session: &SessionRecord,
        messages: &[RenderableMessage],
    ) -> Result<i64> {
        let mut tx = self.conn.unchecked_transaction()?;
        queries::project::upsert(&tx, project)?;
        let session_id = queries::session::upsert(&tx, session)?;

        let mut max_seq: i64 = -1;
        let mut in_batch = 0usize;
        for message in messages {
            queries::message::upsert(&tx, session_id, message)?;
            max_seq = max_seq.max(message.seq as i64);
            in_batch += 1;
            if in_batch >= WRITE_BATCH_SIZE {
                tx.commit()?;
                tx = self.conn.unchecked_transaction()?;
                in_batch = 0;
            }
        }

        queries::message::delete_after(&tx, session_id, max_seq)?;
        tx.commit()?;
        Ok(session_id)
    }

    pub fn list_projects(&self) -> Result<Vec<ProjectOverview>> {
        queries::project::list_overviews(&self.conn)
    }

    pub fn get_project(&self, id: &str) -> Result<Option<ProjectRecord>> {
        queries::project::get(&self.conn, id)
    }

    pub fn list_sessions(&self, project_id: &str) -> Result<Vec<SessionSummary>> {
        queries::session::list(&self.conn, project_id)
    }

    pub fn list_all_sessions(&self) -> Result<Vec<SessionSummary>> {
        queries::session::list_all(&self.conn)
    }

    pub fn get_session(
        &self,
        project_id: &str,
        external_id: &str,
    ) -> Result<Option<SessionRecord>> {
        queries::session::get(&self.conn, project_id, external_id)
    }

    pub fn get_session_by_id(&self, session_id: i64) -> Result<Option<SessionRecord>> {
        queries::session::get_by_id(&self.conn, session_id)
    }

    pub fn get_messages(&self, session_id: i64) -> Result<Vec<RenderableMessage>> {
        queries::message::get_all(&self.conn, session_id)
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute("VACUUM", [])?;
        Ok(())
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").finish_non_exhaustive()
    }
}

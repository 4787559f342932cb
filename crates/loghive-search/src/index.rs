use rusqlite::{Connection, params};
use std::path::Path;

use crate::{Error, Result};

/// Hard cap on returned hits, regardless of the caller's limit.
pub const MAX_SEARCH_RESULTS: usize = 100;

/// Rows per committed transaction during a session replacement, matching the
/// primary store's write cadence. A partially committed prefix is healed by
/// the next replacement's delete-then-reinsert.
pub const WRITE_BATCH_SIZE: usize = 200;

/// bm25 weights: body dominates, titles contribute a little, the UNINDEXED
/// identifier columns nothing.
const RANK: &str = "bm25(message_index, 4.0, 1.0, 1.0)";

/// One message's searchable projection, as handed over by the import writer.
#[derive(Debug, Clone, Copy)]
pub struct SearchDocument<'a> {
    pub session_id: i64,
    pub project_id: &'a str,
    pub card_type: &'a str,
    pub session_title: &'a str,
    pub project_name: &'a str,
    pub timestamp: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct SearchHit {
    pub session_id: i64,
    pub project_id: String,
    pub card_type: String,
    /// Highlighted excerpt of the matched body.
    pub snippet: String,
    pub timestamp: String,
}

pub struct SearchIndex {
    conn: Connection,
}

impl SearchIndex {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(db_path)?;
        let index = Self { conn };
        index.init_schema()?;
        Ok(index)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let index = Self { conn };
        index.init_schema()?;
        Ok(index)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE VIRTUAL TABLE IF NOT EXISTS message_index USING fts5(
                body,
                session_title,
                project_name,
                session_id UNINDEXED,
                project_id UNINDEXED,
                card_type UNINDEXED,
                timestamp UNINDEXED,
                tokenize = 'trigram'
            );
            "#,
        )?;
        Ok(())
    }

    /// Replace a session's rows wholesale: delete, then reinsert committing
    /// every [`WRITE_BATCH_SIZE`] rows so long sessions never pile into one
    /// oversized transaction. Re-imports recompute from scratch instead of
    /// diffing.
    pub fn replace_session(&self, session_id: i64, documents: &[SearchDocument]) -> Result<()> {
        let mut tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "DELETE FROM message_index WHERE session_id = ?1",
            [session_id],
        )?;
        let mut in_batch = 0usize;
        for doc in documents {
            tx.execute(
                r#"
                INSERT INTO message_index (body, session_title, project_name,
                                           session_id, project_id, card_type, timestamp)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    doc.body,
                    doc.session_title,
                    doc.project_name,
                    doc.session_id,
                    doc.project_id,
                    doc.card_type,
                    doc.timestamp
                ],
            )?;
            in_batch += 1;
            if in_batch >= WRITE_BATCH_SIZE {
                tx.commit()?;
                tx = self.conn.unchecked_transaction()?;
                in_batch = 0;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn delete_by_session(&self, session_id: i64) -> Result<()> {
        self.conn.execute(
            "DELETE FROM message_index WHERE session_id = ?1",
            [session_id],
        )?;
        Ok(())
    }

    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let phrase = phrase_query(query)?;
        let limit = limit.min(MAX_SEARCH_RESULTS);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT session_id, project_id, card_type,
                   snippet(message_index, 0, '[', ']', '…', 24), timestamp
            FROM message_index
            WHERE message_index MATCH ?1
            ORDER BY {RANK}, timestamp DESC
            LIMIT ?2
            "#
        ))?;
        let hits = stmt
            .query_map(params![&phrase, limit as i64], hit_from_row)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(hits)
    }

    pub fn search_by_project(
        &self,
        project_name: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchHit>> {
        let phrase = phrase_query(query)?;
        let limit = limit.min(MAX_SEARCH_RESULTS);
        let mut stmt = self.conn.prepare(&format!(
            r#"
            SELECT session_id, project_id, card_type,
                   snippet(message_index, 0, '[', ']', '…', 24), timestamp
            FROM message_index
            WHERE message_index MATCH ?1 AND project_name = ?2
            ORDER BY {RANK}, timestamp DESC
            LIMIT ?3
            "#
        ))?;
        let hits = stmt
            .query_map(params![&phrase, project_name, limit as i64], hit_from_row)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(hits)
    }

    /// Drop every row. Rebuilds reinsert from the primary store afterwards.
    pub fn clear(&self) -> Result<()> {
        self.conn.execute("DELETE FROM message_index", [])?;
        Ok(())
    }

    /// Merge FTS5 b-tree segments accumulated by incremental writes.
    pub fn optimize(&self) -> Result<()> {
        self.conn.execute(
            "INSERT INTO message_index(message_index) VALUES('optimize')",
            [],
        )?;
        Ok(())
    }

    pub fn vacuum(&self) -> Result<()> {
        self.conn.execute("VACUUM", [])?;
        Ok(())
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex").finish_non_exhaustive()
    }
}

fn hit_from_row(row: &rusqlite::Row<'_>) -> std::result::Result<SearchHit, rusqlite::Error> {
    Ok(SearchHit {
        session_id: row.get(0)?,
        project_id: row.get(1)?,
        card_type: row.get(2)?,
        snippet: row.get(3)?,
        timestamp: row.get(4)?,
    })
}

/// Wrap the whole query as a single literal phrase so callers never escape
/// punctuation-heavy content (paths, code). Internal quotes are doubled per
/// FTS5 string syntax. The trigram tokenizer cannot match anything shorter
/// than three characters, so such queries are rejected up front.
fn phrase_query(query: &str) -> Result<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidQuery("query is empty".to_string()));
    }
    if trimmed.chars().count() < 3 {
        return Err(Error::InvalidQuery(
            "trigram search needs at least 3 characters".to_string(),
        ));
    }
    Ok(format!("\"{}\"", trimmed.replace('"', "\"\"")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrase_query_quotes_and_doubles() {
        assert_eq!(phrase_query("src/main.rs").unwrap(), "\"src/main.rs\"");
        assert_eq!(
            phrase_query(r#"say "hello""#).unwrap(),
            r#""say ""hello""""#
        );
    }

    #[test]
    fn short_query_is_invalid() {
        assert!(matches!(phrase_query("ab"), Err(Error::InvalidQuery(_))));
        assert!(matches!(phrase_query("  "), Err(Error::InvalidQuery(_))));
    }
}

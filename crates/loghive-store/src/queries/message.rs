use loghive_types::{CardType, RenderableMessage};
use rusqlite::{Connection, params};

use crate::{Error, Result};

/// Full-column overwrite on conflict: a re-imported message replaces the
/// stored row wholesale, keeping `(session_id, seq)` idempotent.
pub fn upsert(conn: &Connection, session_id: i64, message: &RenderableMessage) -> Result<()> {
    let content_json = serde_json::to_string(&message.content)?;
    conn.execute(
        r#"
        INSERT INTO messages (session_id, seq, card_type, title, subtitle,
                              content_json, is_error, expandable, timestamp)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT(session_id, seq) DO UPDATE SET
            card_type = ?3,
            title = ?4,
            subtitle = ?5,
            content_json = ?6,
            is_error = ?7,
            expandable = ?8,
            timestamp = ?9
        "#,
        params![
            session_id,
            message.seq as i64,
            message.card_type.as_str(),
            &message.title,
            &message.subtitle,
            &content_json,
            message.is_error,
            message.expandable,
            &message.timestamp
        ],
    )?;

    Ok(())
}

/// Drops trailing rows past the last written sequence, so a session that
/// shrank between imports does not keep orphaned messages.
pub fn delete_after(conn: &Connection, session_id: i64, max_seq: i64) -> Result<usize> {
    let deleted = conn.execute(
        "DELETE FROM messages WHERE session_id = ?1 AND seq > ?2",
        params![session_id, max_seq],
    )?;
    Ok(deleted)
}

pub fn get_all(conn: &Connection, session_id: i64) -> Result<Vec<RenderableMessage>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT seq, card_type, title, subtitle, content_json, is_error,
               expandable, timestamp
        FROM messages
        WHERE session_id = ?1
        ORDER BY seq ASC
        "#,
    )?;

    let rows = stmt
        .query_map([session_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
                row.get::<_, bool>(5)?,
                row.get::<_, bool>(6)?,
                row.get::<_, Option<String>>(7)?,
            ))
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    let mut messages = Vec::with_capacity(rows.len());
    for (seq, card_type, title, subtitle, content_json, is_error, expandable, timestamp) in rows {
        let card_type = CardType::parse(&card_type)
            .ok_or_else(|| Error::Query(format!("unknown card type: {}", card_type)))?;
        let content = content_json
            .as_deref()
            .map(serde_json::from_str)
            .transpose()?
            .unwrap_or_default();
        messages.push(RenderableMessage {
            seq: seq as usize,
            card_type,
            title,
            subtitle,
            content,
            is_error,
            expandable,
            timestamp: timestamp.unwrap_or_default(),
        });
    }

    Ok(messages)
}

use rusqlite::{Connection, OptionalExtension, params};

use crate::{Result, records::SessionRecord, records::SessionSummary};

/// Upsert keyed by `(project_id, external_id)`; the input's `id` field is
/// ignored. Returns the session rowid, freshly assigned or pre-existing.
pub fn upsert(conn: &Connection, session: &SessionRecord) -> Result<i64> {
    let models_json = serde_json::to_string(&session.models)?;
    conn.execute(
        r#"
        INSERT INTO sessions (project_id, provider, external_id, title, version,
                              git_branch, cwd, models_json, message_count,
                              created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
        ON CONFLICT(project_id, external_id) DO UPDATE SET
            provider = ?2,
            title = ?4,
            version = COALESCE(?5, version),
            git_branch = COALESCE(?6, git_branch),
            cwd = COALESCE(?7, cwd),
            models_json = ?8,
            message_count = ?9,
            created_at = COALESCE(?10, created_at),
            updated_at = COALESCE(?11, updated_at)
        "#,
        params![
            &session.project_id,
            &session.provider,
            &session.external_id,
            &session.title,
            &session.version,
            &session.git_branch,
            &session.cwd,
            &models_json,
            session.message_count as i64,
            &session.created_at,
            &session.updated_at
        ],
    )?;

    let id: i64 = conn.query_row(
        "SELECT id FROM sessions WHERE project_id = ?1 AND external_id = ?2",
        params![&session.project_id, &session.external_id],
        |row| row.get(0),
    )?;
    Ok(id)
}

pub fn get(
    conn: &Connection,
    project_id: &str,
    external_id: &str,
) -> Result<Option<SessionRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT id, project_id, provider, external_id, title, version,
               git_branch, cwd, models_json, message_count, created_at, updated_at
        FROM sessions
        WHERE project_id = ?1 AND external_id = ?2
        "#,
            params![project_id, external_id],
            from_row,
        )
        .optional()?;

    Ok(result)
}

pub fn get_by_id(conn: &Connection, session_id: i64) -> Result<Option<SessionRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT id, project_id, provider, external_id, title, version,
               git_branch, cwd, models_json, message_count, created_at, updated_at
        FROM sessions
        WHERE id = ?1
        "#,
            [session_id],
            from_row,
        )
        .optional()?;

    Ok(result)
}

pub fn list(conn: &Connection, project_id: &str) -> Result<Vec<SessionSummary>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, project_id, provider, external_id, title, message_count,
               created_at, updated_at
        FROM sessions
        WHERE project_id = ?1
        ORDER BY updated_at DESC
        "#,
    )?;

    let sessions = stmt
        .query_map([project_id], |row| {
            Ok(SessionSummary {
                id: row.get(0)?,
                project_id: row.get(1)?,
                provider: row.get(2)?,
                external_id: row.get(3)?,
                title: row.get(4)?,
                message_count: row.get::<_, i64>(5)? as usize,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(sessions)
}

pub fn list_all(conn: &Connection) -> Result<Vec<SessionSummary>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT id, project_id, provider, external_id, title, message_count,
               created_at, updated_at
        FROM sessions
        ORDER BY id ASC
        "#,
    )?;

    let sessions = stmt
        .query_map([], |row| {
            Ok(SessionSummary {
                id: row.get(0)?,
                project_id: row.get(1)?,
                provider: row.get(2)?,
                external_id: row.get(3)?,
                title: row.get(4)?,
                message_count: row.get::<_, i64>(5)? as usize,
                created_at: row.get(6)?,
                updated_at: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(sessions)
}

fn from_row(row: &rusqlite::Row<'_>) -> std::result::Result<SessionRecord, rusqlite::Error> {
    let models_json: Option<String> = row.get(8)?;
    let models = models_json
        .as_deref()
        .and_then(|j| serde_json::from_str(j).ok())
        .unwrap_or_default();
    Ok(SessionRecord {
        id: row.get(0)?,
        project_id: row.get(1)?,
        provider: row.get(2)?,
        external_id: row.get(3)?,
        title: row.get(4)?,
        version: row.get(5)?,
        git_branch: row.get(6)?,
        cwd: row.get(7)?,
        models,
        message_count: row.get::<_, i64>(9)? as usize,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

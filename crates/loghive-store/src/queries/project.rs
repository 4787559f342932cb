use rusqlite::{Connection, OptionalExtension, params};

use crate::{Result, records::ProjectOverview, records::ProjectRecord};

/// Timestamps widen monotonically: `created_at` only moves earlier,
/// `updated_at` only later. Scalar MIN/MAX return NULL when either side is
/// NULL, hence the COALESCE chains.
pub fn upsert(conn: &Connection, project: &ProjectRecord) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO projects (id, name, path, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        ON CONFLICT(id) DO UPDATE SET
            name = ?2,
            path = COALESCE(?3, path),
            created_at = COALESCE(MIN(created_at, ?4), created_at, ?4),
            updated_at = COALESCE(MAX(updated_at, ?5), updated_at, ?5)
        "#,
        params![
            &project.id,
            &project.name,
            &project.path,
            &project.created_at,
            &project.updated_at
        ],
    )?;

    Ok(())
}

pub fn get(conn: &Connection, id: &str) -> Result<Option<ProjectRecord>> {
    let result = conn
        .query_row(
            r#"
        SELECT id, name, path, created_at, updated_at
        FROM projects
        WHERE id = ?1
        "#,
            [id],
            |row| {
                Ok(ProjectRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    path: row.get(2)?,
                    created_at: row.get(3)?,
                    updated_at: row.get(4)?,
                })
            },
        )
        .optional()?;

    Ok(result)
}

pub fn list_overviews(conn: &Connection) -> Result<Vec<ProjectOverview>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT p.id, p.name, p.path, p.updated_at,
               COUNT(s.id),
               GROUP_CONCAT(DISTINCT s.provider)
        FROM projects p
        LEFT JOIN sessions s ON s.project_id = p.id
        GROUP BY p.id
        ORDER BY p.updated_at DESC
        "#,
    )?;

    let projects = stmt
        .query_map([], |row| {
            let providers: Option<String> = row.get(5)?;
            let mut providers: Vec<String> = providers
                .unwrap_or_default()
                .split(',')
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
            providers.sort();
            Ok(ProjectOverview {
                id: row.get(0)?,
                name: row.get(1)?,
                path: row.get(2)?,
                updated_at: row.get(3)?,
                session_count: row.get::<_, i64>(4)? as usize,
                providers,
            })
        })?
        .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

    Ok(projects)
}

/// Project row in the primary store.
///
/// `id` is the deterministic hash of the normalized project path, so the
/// same directory always maps to the same row across imports and machines.
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: String,
    /// Display name (last path component of the raw path).
    pub name: String,
    /// Raw project path as the provider reported it.
    pub path: Option<String>,
    /// Min over the project's session created times (ISO 8601).
    pub created_at: Option<String>,
    /// Max over the project's session updated times (ISO 8601).
    pub updated_at: Option<String>,
}

/// Session row in the primary store. `id` is the SQLite rowid, assigned on
/// first insert; `(project_id, external_id)` is the upsert key.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: i64,
    pub project_id: String,
    pub provider: String,
    /// Provider-local session identifier.
    pub external_id: String,
    pub title: String,
    pub version: Option<String>,
    pub git_branch: Option<String>,
    pub cwd: Option<String>,
    /// `[(model, count)]` sorted descending by count, JSON-encoded.
    pub models: Vec<(String, u64)>,
    pub message_count: usize,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Lightweight session summary for list operations.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SessionSummary {
    pub id: i64,
    pub project_id: String,
    pub provider: String,
    pub external_id: String,
    pub title: String,
    pub message_count: usize,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// A project with its session aggregates, for `projects` listings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProjectOverview {
    pub id: String,
    pub name: String,
    pub path: Option<String>,
    pub session_count: usize,
    /// Distinct providers with at least one session, sorted.
    pub providers: Vec<String>,
    pub updated_at: Option<String>,
}

use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

use crate::traits::{RawSession, SessionLocator};

/// Codex writes one `rollout-<datetime>-<uuid>.jsonl` per session under a
/// `YYYY/MM/DD` directory tree. The session id lives in the first line's
/// session_meta payload; the file stem serves until the normalizer reads it.
pub struct CodexLocator;

impl SessionLocator for CodexLocator {
    fn provider(&self) -> &'static str {
        "codex"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in WalkDir::new(log_root).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "jsonl") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            if !name.starts_with("rollout-") {
                continue;
            }
            if std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) == 0 {
                continue;
            }

            let stem = name.trim_end_matches(".jsonl");
            let external_id = stem
                .rsplit('-')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(stem)
                .to_string();

            sessions.push(RawSession::from_path(external_id, path.to_path_buf()));
        }

        Ok(sessions)
    }
}

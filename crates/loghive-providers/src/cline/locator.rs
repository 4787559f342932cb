use anyhow::Result;
use std::path::Path;

use crate::traits::{RawSession, SessionLocator};

/// Cline keeps one directory per task under `~/.cline/tasks/<task-id>/`,
/// holding `api_conversation_history.json` plus `task_metadata.json`. The
/// raw session root is the task directory itself.
pub struct ClineLocator;

impl SessionLocator for ClineLocator {
    fn provider(&self) -> &'static str {
        "cline"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(log_root)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !path.is_dir() || !path.join("api_conversation_history.json").is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            sessions.push(RawSession::from_path(name.to_string(), path));
        }

        Ok(sessions)
    }
}

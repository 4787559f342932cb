use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

use crate::traits::{RawSession, SessionLocator};

/// Gemini CLI stores one aggregated JSON per session under
/// `<log_root>/<project-hash>/chats/session-*.json`. The hash directories
/// are one-way, so no project path can be reconstructed from the layout;
/// grouping relies entirely on the payload's workspace field.
pub struct GeminiLocator;

impl SessionLocator for GeminiLocator {
    fn provider(&self) -> &'static str {
        "gemini"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in WalkDir::new(log_root)
            .max_depth(3)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|f| f.to_str()) else {
                continue;
            };
            if !name.starts_with("session-") || !name.ends_with(".json") {
                continue;
            }
            if std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) == 0 {
                continue;
            }

            let external_id = name
                .trim_start_matches("session-")
                .trim_end_matches(".json")
                .to_string();
            sessions.push(RawSession::from_path(external_id, path.to_path_buf()));
        }

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn finds_sessions_under_hash_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let chats = dir.path().join("a1b2c3/chats");
        fs::create_dir_all(&chats).unwrap();
        fs::write(chats.join("session-42.json"), "{}").unwrap();
        fs::write(chats.join("logs.json"), "{}").unwrap();

        let sessions = GeminiLocator.list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].external_id, "42");
        assert!(sessions[0].dir_project_hint.is_none());
    }
}

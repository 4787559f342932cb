use anyhow::Result;
use std::path::Path;

use crate::traits::{RawSession, SessionLocator};

/// OpenCode splits a session across three sibling trees under its storage
/// root: `session/<id>.json` (metadata), `message/<session-id>/*.json` (one
/// file per message) and `part/<message-id>/*.json` (content parts). The
/// locator only enumerates the metadata files; the normalizer walks the rest.
pub struct OpencodeLocator;

impl SessionLocator for OpencodeLocator {
    fn provider(&self) -> &'static str {
        "opencode"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        let session_dir = log_root.join("session");
        if !session_dir.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(&session_dir)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            sessions.push(RawSession::from_path(stem.to_string(), path));
        }

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_session_info_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("session")).unwrap();
        fs::create_dir_all(dir.path().join("message/ses_1")).unwrap();
        fs::write(dir.path().join("session/ses_1.json"), "{}").unwrap();

        let sessions = OpencodeLocator.list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].external_id, "ses_1");
    }

    #[test]
    fn missing_storage_root_is_empty() {
        let sessions = OpencodeLocator
            .list_sessions(Path::new("/nonexistent/opencode"))
            .unwrap();
        assert!(sessions.is_empty());
    }
}

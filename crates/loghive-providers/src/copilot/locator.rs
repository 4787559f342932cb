use anyhow::Result;
use std::path::Path;

use crate::traits::{RawSession, SessionLocator};

/// Copilot CLI writes one directory per session under
/// `~/.copilot/history-session-state/<session-id>/`, each holding a
/// `state.json` with the full timeline.
pub struct CopilotLocator;

impl SessionLocator for CopilotLocator {
    fn provider(&self) -> &'static str {
        "copilot"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(log_root)? {
            let Ok(entry) = entry else { continue };
            let state = entry.path().join("state.json");
            if !state.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(String::from) else {
                continue;
            };
            sessions.push(RawSession::from_path(name, state));
        }

        Ok(sessions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn lists_session_state_files() {
        let dir = tempfile::tempdir().unwrap();
        let session = dir.path().join("a81f-22");
        fs::create_dir_all(&session).unwrap();
        fs::write(session.join("state.json"), "{}").unwrap();
        fs::create_dir_all(dir.path().join("no-state")).unwrap();

        let sessions = CopilotLocator.list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].external_id, "a81f-22");
        assert!(sessions[0].root.ends_with("a81f-22/state.json"));
    }

    #[test]
    fn missing_root_is_empty() {
        let sessions = CopilotLocator
            .list_sessions(Path::new("/nonexistent/copilot"))
            .unwrap();
        assert!(sessions.is_empty());
    }
}

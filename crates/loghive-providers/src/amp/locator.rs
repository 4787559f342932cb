use anyhow::Result;
use std::path::Path;

use crate::traits::{RawSession, SessionLocator};

/// Amp keeps one aggregated JSON per thread directly under its threads
/// directory, named `T-<id>.json`. No layout-derived project hint exists;
/// the working directory sits inside the payload's `env` block.
pub struct AmpLocator;

impl SessionLocator for AmpLocator {
    fn provider(&self) -> &'static str {
        "amp"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in std::fs::read_dir(log_root)? {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "json") {
                continue;
            }
            if std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0) == 0 {
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
    fn lists_thread_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("T-abc123.json"), "{}").unwrap();
        fs::write(dir.path().join("T-empty.json"), "").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let sessions = AmpLocator.list_sessions(dir.path()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].external_id, "T-abc123");
    }

    #[test]
    fn missing_root_is_empty() {
        let sessions = AmpLocator
            .list_sessions(Path::new("/nonexistent/amp/threads"))
            .unwrap();
        assert!(sessions.is_empty());
    }
}

use anyhow::Result;
use std::path::Path;
use walkdir::WalkDir;

use crate::traits::{RawSession, SessionLocator};

/// Claude Code keeps one JSONL stream per session under
/// `<log_root>/<sanitized-project-dir>/<session-uuid>.jsonl`, where the
/// project directory is the working directory with separators replaced by
/// dashes (`/Users/a/b` -> `-Users-a-b`).
pub struct ClaudeCodeLocator;

impl SessionLocator for ClaudeCodeLocator {
    fn provider(&self) -> &'static str {
        "claude_code"
    }

    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>> {
        let mut sessions = Vec::new();
        if !log_root.exists() {
            return Ok(sessions);
        }

        for entry in WalkDir::new(log_root)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().is_none_or(|e| e != "jsonl") {
                continue;
            }
            if std::fs::metadata(path).map(|m| m.len()).unwrap_or(0) == 0 {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let hint = path
                .parent()
                .and_then(|p| p.file_name())
                .and_then(|n| n.to_str())
                .and_then(desanitize_project_dir);

            sessions.push(RawSession::from_path(stem.to_string(), path.to_path_buf()).with_hint(hint));
        }

        Ok(sessions)
    }
}

/// Best-effort inverse of Claude Code's project directory encoding. The
/// encoding is lossy (dots become dashes too), so this is only a fallback
/// when no record declares a cwd.
fn desanitize_project_dir(name: &str) -> Option<String> {
    if !name.starts_with('-') {
        return None;
    }
    let path = name.replace('-', "/");
    if path.trim_matches('/').is_empty() {
        None
    } else {
        Some(path)
    }
}

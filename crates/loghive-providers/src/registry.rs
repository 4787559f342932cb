use crate::traits::ProviderAdapter;
use anyhow::{Result, anyhow};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: &'static str,
    pub description: &'static str,
    pub default_log_root: &'static str,
}

const PROVIDERS: &[ProviderMetadata] = &[
    ProviderMetadata {
        name: "claude_code",
        description: "Claude Code CLI",
        default_log_root: "~/.claude/projects",
    },
    ProviderMetadata {
        name: "codex",
        description: "Codex CLI",
        default_log_root: "~/.codex/sessions",
    },
    ProviderMetadata {
        name: "gemini",
        description: "Gemini CLI",
        default_log_root: "~/.gemini/tmp",
    },
    ProviderMetadata {
        name: "opencode",
        description: "OpenCode",
        default_log_root: "~/.local/share/opencode/storage",
    },
    ProviderMetadata {
        name: "amp",
        description: "Amp CLI",
        default_log_root: "~/.local/share/amp/threads",
    },
    ProviderMetadata {
        name: "cline",
        description: "Cline",
        default_log_root: "~/.cline/tasks",
    },
    ProviderMetadata {
        name: "copilot",
        description: "GitHub Copilot CLI",
        default_log_root: "~/.copilot/history-session-state",
    },
];

pub fn providers() -> &'static [ProviderMetadata] {
    PROVIDERS
}

pub fn expand_home_path(path: &str) -> Option<PathBuf> {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return Some(home.join(stripped));
    }
    Some(PathBuf::from(path)).filter(|p| !p.as_os_str().is_empty())
}

pub fn default_log_roots() -> Vec<(String, PathBuf)> {
    let mut roots = Vec::new();
    for provider in PROVIDERS {
        if let Some(expanded) = expand_home_path(provider.default_log_root) {
            roots.push((provider.name.to_string(), expanded));
        }
    }
    roots
}

pub fn adapter_for(name: &str) -> Result<ProviderAdapter> {
    match name {
        "claude_code" | "claude" => Ok(crate::claude_code::adapter()),
        "codex" => Ok(crate::codex::adapter()),
        "gemini" => Ok(crate::gemini::adapter()),
        "opencode" => Ok(crate::opencode::adapter()),
        "amp" => Ok(crate::amp::adapter()),
        "cline" => Ok(crate::cline::adapter()),
        "copilot" => Ok(crate::copilot::adapter()),
        _ => Err(anyhow!("Unknown provider: {}", name)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_provider_has_an_adapter() {
        for metadata in providers() {
            let adapter = adapter_for(metadata.name).unwrap();
            assert_eq!(adapter.id(), metadata.name);
        }
    }

    #[test]
    fn unknown_provider_is_an_error() {
        assert!(adapter_for("vim").is_err());
    }
}

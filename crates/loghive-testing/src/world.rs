//! TestWorld: an isolated workspace plus per-provider log roots, and a
//! preconfigured CLI command pointed at both.

use assert_cmd::Command;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestWorld {
    temp_dir: TempDir,
    workspace: PathBuf,
    log_roots: BTreeMap<String, PathBuf>,
}

impl Default for TestWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorld {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let workspace = temp_dir.path().join("workspace");
        std::fs::create_dir_all(&workspace).expect("Failed to create workspace dir");
        Self {
            temp_dir,
            workspace,
            log_roots: BTreeMap::new(),
        }
    }

    /// Register a provider with its own empty log root and enable it in the
    /// workspace config.
    pub fn with_provider(mut self, name: &str) -> Self {
        let log_root = self.temp_dir.path().join(format!("{name}-logs"));
        std::fs::create_dir_all(&log_root).expect("Failed to create log root");
        self.log_roots.insert(name.to_string(), log_root);
        self.write_config();
        self
    }

    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    pub fn log_root(&self, provider: &str) -> &Path {
        self.log_roots
            .get(provider)
            .unwrap_or_else(|| panic!("provider {provider} not registered"))
    }

    pub fn primary_db(&self) -> PathBuf {
        self.workspace.join("loghive.db")
    }

    pub fn search_db(&self) -> PathBuf {
        self.workspace.join("search.db")
    }

    fn write_config(&self) {
        let mut content = String::new();
        for (name, log_root) in &self.log_roots {
            content.push_str(&format!(
                "[providers.{name}]\nenabled = true\nlog_root = \"{}\"\n\n",
                log_root.display()
            ));
        }
        std::fs::write(self.workspace.join("config.toml"), content)
            .expect("Failed to write config");
    }

    /// A `loghive` command with the workspace wired via environment; tests
    /// append their own arguments and assert on the output.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("loghive").expect("loghive binary not built");
        cmd.env("LOGHIVE_PATH", &self.workspace);
        cmd.current_dir(self.temp_dir.path());
        cmd
    }
}

use anyhow::Result;
use std::path::{Path, PathBuf};

use loghive_types::{
    SessionDetail, SessionWithProject, project_name_from_path, system_time_to_rfc3339,
};

/// One raw session as found on disk, before any parsing. `root` is the file
/// (JSONL / aggregated JSON) or directory (per-message trees) the normalizer
/// reads from.
#[derive(Debug, Clone)]
pub struct RawSession {
    pub external_id: String,
    pub root: PathBuf,
    /// Project path recoverable from the provider's on-disk directory naming,
    /// used when the payload declares no working directory.
    pub dir_project_hint: Option<String>,
    /// Filesystem times, the fallback when the format carries no timestamps.
    pub fs_created: Option<String>,
    pub fs_modified: Option<String>,
}

impl RawSession {
    pub fn from_path(external_id: String, root: PathBuf) -> Self {
        let (fs_created, fs_modified) = fs_times(&root);
        RawSession {
            external_id,
            root,
            dir_project_hint: None,
            fs_created,
            fs_modified,
        }
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.dir_project_hint = hint;
        self
    }
}

fn fs_times(path: &Path) -> (Option<String>, Option<String>) {
    let Ok(metadata) = std::fs::metadata(path) else {
        return (None, None);
    };
    let created = metadata.created().ok().map(system_time_to_rfc3339);
    let modified = metadata.modified().ok().map(system_time_to_rfc3339);
    (created.or_else(|| modified.clone()), modified)
}

/// Finds raw session files under a provider-specific root. Read-only
/// filesystem scan; safe to run concurrently with other locators.
pub trait SessionLocator: Send + Sync {
    fn provider(&self) -> &'static str;

    /// Enumerate sessions under `log_root`. A missing root is an empty list,
    /// not an error.
    fn list_sessions(&self, log_root: &Path) -> Result<Vec<RawSession>>;
}

/// Parses one raw session into the canonical model. Returns `None` on
/// malformed input rather than raising; partial damage inside a session
/// degrades to error-styled info messages instead.
pub trait SessionNormalizer: Send + Sync {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail>;
}

/// A session the adapter found but will not import, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedSession {
    pub external_id: String,
    pub reason: String,
}

/// Everything one adapter produced for a scan: importable sessions plus the
/// ones it had to skip.
#[derive(Debug, Default)]
pub struct ProviderScan {
    pub sessions: Vec<SessionWithProject>,
    pub skipped: Vec<SkippedSession>,
}

/// A provider-specific Locator+Normalizer pair. Adapters are mutually
/// independent and side-effect-free beyond reading the filesystem.
pub struct ProviderAdapter {
    pub locator: Box<dyn SessionLocator>,
    pub normalizer: Box<dyn SessionNormalizer>,
}

impl ProviderAdapter {
    pub fn new(locator: Box<dyn SessionLocator>, normalizer: Box<dyn SessionNormalizer>) -> Self {
        Self {
            locator,
            normalizer,
        }
    }

    pub fn id(&self) -> &'static str {
        self.locator.provider()
    }

    /// Locate, parse and project-resolve every session under `log_root`.
    ///
    /// A session whose project path cannot be resolved to a non-empty value
    /// is skipped: an unresolvable project identity is worse than a missing
    /// session. Unparseable sessions are skipped the same way.
    pub fn collect_sessions(&self, log_root: &Path) -> Result<ProviderScan> {
        let mut scan = ProviderScan::default();

        for raw in self.locator.list_sessions(log_root)? {
            let Some(detail) = self.normalizer.parse(&raw) else {
                scan.skipped.push(SkippedSession {
                    external_id: raw.external_id.clone(),
                    reason: "unparseable session payload".to_string(),
                });
                continue;
            };

            let project_path = detail
                .metadata
                .cwd
                .clone()
                .filter(|p| !p.trim().is_empty())
                .or_else(|| raw.dir_project_hint.clone())
                .filter(|p| !p.trim().is_empty());

            let Some(project_path) = project_path else {
                scan.skipped.push(SkippedSession {
                    external_id: raw.external_id.clone(),
                    reason: "no resolvable project path".to_string(),
                });
                continue;
            };

            let created_at = detail
                .metadata
                .created_at
                .clone()
                .or_else(|| raw.fs_created.clone())
                .unwrap_or_default();
            let updated_at = detail
                .metadata
                .modified_at
                .clone()
                .or_else(|| raw.fs_modified.clone())
                .unwrap_or_else(|| created_at.clone());

            scan.sessions.push(SessionWithProject {
                provider: self.id().to_string(),
                project_name: project_name_from_path(&project_path),
                project_path,
                created_at,
                updated_at,
                detail,
            });
        }

        Ok(scan)
    }
}

use std::path::PathBuf;

use loghive_providers::{ProviderScan, adapter_for};
use loghive_search::SearchIndex;
use loghive_store::Database;
use loghive_types::SessionWithProject;

use crate::writer::{DualWriter, WriteOutcome};
use crate::{Config, Error, Result};

#[derive(Debug, Clone)]
pub enum ImportProgress {
    LogRootMissing {
        provider: String,
        log_root: PathBuf,
    },
    ProviderScanning {
        provider: String,
    },
    ProviderFailed {
        provider: String,
        error: String,
    },
    ProviderScanned {
        provider: String,
        found: usize,
        skipped: usize,
    },
    SessionImported {
        provider: String,
        external_id: String,
    },
    SessionSkipped {
        provider: String,
        external_id: String,
        reason: String,
    },
    SessionFailed {
        provider: String,
        external_id: String,
        error: String,
    },
    /// Primary store committed but the search rows did not.
    SearchIndexDegraded {
        external_id: String,
        error: String,
    },
    Completed {
        report: ImportReport,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub errored: usize,
}

/// Coordinates one import run: scan all configured providers in parallel,
/// then persist sequentially through the dual-store writer.
pub struct ImportService<'a> {
    db: &'a Database,
    index: &'a SearchIndex,
}

impl<'a> ImportService<'a> {
    pub fn new(db: &'a Database, index: &'a SearchIndex) -> Self {
        Self { db, index }
    }

    pub fn import_all<F>(&self, config: &Config, mut on_progress: F) -> Result<ImportReport>
    where
        F: FnMut(ImportProgress),
    {
        let mut targets = Vec::new();
        for (name, log_root) in config.enabled_providers() {
            let adapter = adapter_for(&name).map_err(Error::Provider)?;
            if !log_root.exists() {
                on_progress(ImportProgress::LogRootMissing {
                    provider: name,
                    log_root,
                });
                continue;
            }
            on_progress(ImportProgress::ProviderScanning {
                provider: name.clone(),
            });
            targets.push((adapter, name, log_root));
        }

        // Scan phase: one thread per provider, bounded by the roster size.
        // Adapters only read the filesystem, so scans are freely concurrent.
        let scans: Vec<(String, anyhow::Result<ProviderScan>)> = std::thread::scope(|s| {
            let handles: Vec<_> = targets
                .iter()
                .map(|(adapter, _, log_root)| s.spawn(move || adapter.collect_sessions(log_root)))
                .collect();
            targets
                .iter()
                .zip(handles)
                .map(|((_, name, _), handle)| {
                    let result = handle
                        .join()
                        .unwrap_or_else(|_| Err(anyhow::anyhow!("scan thread panicked")));
                    (name.clone(), result)
                })
                .collect()
        });

        // Persist phase: strictly sequential, single writer per store.
        let writer = DualWriter::new(self.db, self.index);
        let mut report = ImportReport::default();

        for (provider, scan) in scans {
            let scan = match scan {
                Ok(scan) => scan,
                Err(err) => {
                    report.errored += 1;
                    on_progress(ImportProgress::ProviderFailed {
                        provider,
                        error: err.to_string(),
                    });
                    continue;
                }
            };

            on_progress(ImportProgress::ProviderScanned {
                provider: provider.clone(),
                found: scan.sessions.len(),
                skipped: scan.skipped.len(),
            });

            for skipped in scan.skipped {
                report.skipped += 1;
                on_progress(ImportProgress::SessionSkipped {
                    provider: provider.clone(),
                    external_id: skipped.external_id,
                    reason: skipped.reason,
                });
            }

            for session in scan.sessions {
                let external_id = session.detail.session_id.clone();
                match writer.write(&session) {
                    Ok(WriteOutcome { search_error, .. }) => {
                        report.imported += 1;
                        on_progress(ImportProgress::SessionImported {
                            provider: provider.clone(),
                            external_id: external_id.clone(),
                        });
                        if let Some(err) = search_error {
                            on_progress(ImportProgress::SearchIndexDegraded {
                                external_id,
                                error: err.to_string(),
                            });
                        }
                    }
                    Err(err) => {
                        report.errored += 1;
                        on_progress(ImportProgress::SessionFailed {
                            provider: provider.clone(),
                            external_id,
                            error: err.to_string(),
                        });
                    }
                }
            }
        }

        on_progress(ImportProgress::Completed { report });
        Ok(report)
    }

    /// Single-session entry point, shared by any push-style caller. Validates
    /// before touching either store.
    pub fn import_session(&self, session: &SessionWithProject) -> Result<WriteOutcome> {
        if session.provider.trim().is_empty() {
            return Err(Error::InvalidRequest("provider is empty".to_string()));
        }
        if session.detail.session_id.trim().is_empty() {
            return Err(Error::InvalidRequest("session id is empty".to_string()));
        }
        if session.project_path.trim().is_empty() {
            return Err(Error::InvalidRequest("project path is empty".to_string()));
        }

        DualWriter::new(self.db, self.index).write(session)
    }

    /// Repopulate the search index from the primary store.
    pub fn rebuild_search_index(&self) -> Result<usize> {
        DualWriter::new(self.db, self.index).rebuild_search_index()
    }
}

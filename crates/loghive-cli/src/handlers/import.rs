use anyhow::Result;
use loghive_runtime::{Config, ImportProgress, ImportService};
use loghive_search::SearchIndex;
use loghive_store::Database;

pub fn handle(db: &Database, index: &SearchIndex, config: &Config, verbose: bool) -> Result<()> {
    if config.enabled_providers().is_empty() {
        println!("No providers enabled; run 'loghive init' first.");
        return Ok(());
    }

    let service = ImportService::new(db, index);
    service.import_all(config, |progress| match progress {
        ImportProgress::LogRootMissing { provider, log_root } => {
            eprintln!(
                "warning: log root missing for {}: {}",
                provider,
                log_root.display()
            );
        }
        ImportProgress::ProviderScanning { provider } => {
            if verbose {
                println!("Scanning {}...", provider);
            }
        }
        ImportProgress::ProviderFailed { provider, error } => {
            eprintln!("error: scan failed for {}: {}", provider, error);
        }
        ImportProgress::ProviderScanned {
            provider,
            found,
            skipped,
        } => {
            if verbose {
                println!("{}: {} session(s), {} skipped", provider, found, skipped);
            }
        }
        ImportProgress::SessionImported {
            provider,
            external_id,
        } => {
            if verbose {
                println!("  imported {}/{}", provider, external_id);
            }
        }
        ImportProgress::SessionSkipped {
            provider,
            external_id,
            reason,
        } => {
            if verbose {
                println!("  skipped {}/{}: {}", provider, external_id, reason);
            }
        }
        ImportProgress::SessionFailed {
            provider,
            external_id,
            error,
        } => {
            eprintln!("error: {}/{}: {}", provider, external_id, error);
        }
        ImportProgress::SearchIndexDegraded { external_id, error } => {
            eprintln!(
                "warning: search rows missing for {} (run 'loghive compact --rebuild'): {}",
                external_id, error
            );
        }
        ImportProgress::Completed { report } => {
            println!(
                "Imported {} session(s), {} skipped, {} error(s)",
                report.imported, report.skipped, report.errored
            );
        }
    })?;

    Ok(())
}

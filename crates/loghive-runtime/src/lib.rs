mod config;
mod error;
mod importer;
mod writer;

pub use config::{
    Config, ProviderSettings, primary_db_path, resolve_workspace_path, search_db_path,
};
pub use error::{Error, Result};
pub use importer::{ImportProgress, ImportReport, ImportService};
pub use writer::{DualWriter, WriteOutcome};

mod coerce;
mod registry;
mod traits;

pub mod amp;
pub mod claude_code;
pub mod cline;
pub mod codex;
pub mod copilot;
pub mod gemini;
pub mod opencode;

pub use coerce::{coerce_content, value_to_input_map};
pub use registry::{
    ProviderMetadata, adapter_for, default_log_roots, expand_home_path, providers,
};
pub use traits::{
    ProviderAdapter, ProviderScan, RawSession, SessionLocator, SessionNormalizer, SkippedSession,
};

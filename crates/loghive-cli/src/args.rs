use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "loghive")]
#[command(about = "Ingest and search chat sessions from AI coding assistants", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Workspace directory holding the stores and config
    /// (defaults to LOGHIVE_PATH, then the platform data directory)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect installed assistants and write config.toml
    Init {
        /// Overwrite an existing config with a fresh detection pass
        #[arg(long)]
        refresh: bool,
    },

    /// Scan configured providers and import sessions into the stores
    Import {
        #[arg(long)]
        verbose: bool,
    },

    /// Full-text search across imported messages
    Search {
        query: String,

        /// Restrict matches to one project name
        #[arg(long)]
        project: Option<String>,

        #[arg(long, default_value = "20")]
        limit: usize,

        #[arg(long)]
        json: bool,
    },

    /// List imported projects
    Projects {
        #[arg(long)]
        json: bool,
    },

    /// List sessions, optionally scoped to one project id
    Sessions {
        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Print one session's messages
    Show {
        session_id: i64,

        #[arg(long)]
        json: bool,
    },

    /// Reclaim space in both stores and optimize the search index
    Compact {
        /// Rebuild the search index from the primary store first
        #[arg(long)]
        rebuild: bool,
    },
}

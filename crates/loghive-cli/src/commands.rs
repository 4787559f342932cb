use anyhow::Result;
use loghive_runtime::{Config, primary_db_path, resolve_workspace_path, search_db_path};
use loghive_search::SearchIndex;
use loghive_store::Database;

use super::args::{Cli, Commands};
use super::handlers;

pub fn run(cli: Cli) -> Result<()> {
    let workspace = resolve_workspace_path(cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Init { refresh } => handlers::init::handle(&workspace, refresh),

        Commands::Import { verbose } => {
            let config = Config::load_from(&workspace.join("config.toml"))?;
            let db = Database::open(&primary_db_path(&workspace))?;
            let index = SearchIndex::open(&search_db_path(&workspace))?;
            handlers::import::handle(&db, &index, &config, verbose)
        }

        Commands::Search {
            query,
            project,
            limit,
            json,
        } => {
            let index = SearchIndex::open(&search_db_path(&workspace))?;
            handlers::search::handle(&index, &query, project.as_deref(), limit, json)
        }

        Commands::Projects { json } => {
            let db = Database::open(&primary_db_path(&workspace))?;
            handlers::projects::handle(&db, json)
        }

        Commands::Sessions { project, json } => {
            let db = Database::open(&primary_db_path(&workspace))?;
            handlers::sessions::handle(&db, project.as_deref(), json)
        }

        Commands::Show { session_id, json } => {
            let db = Database::open(&primary_db_path(&workspace))?;
            handlers::show::handle(&db, session_id, json)
        }

        Commands::Compact { rebuild } => {
            let db = Database::open(&primary_db_path(&workspace))?;
            let index = SearchIndex::open(&search_db_path(&workspace))?;
            handlers::compact::handle(&db, &index, rebuild)
        }
    }
}

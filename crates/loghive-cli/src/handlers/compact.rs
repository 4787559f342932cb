use anyhow::Result;
use loghive_runtime::ImportService;
use loghive_search::SearchIndex;
use loghive_store::Database;

pub fn handle(db: &Database, index: &SearchIndex, rebuild: bool) -> Result<()> {
    if rebuild {
        let indexed = ImportService::new(db, index).rebuild_search_index()?;
        println!("Reindexed {} message(s)", indexed);
    }

    index.optimize()?;
    index.vacuum()?;
    db.vacuum()?;
    println!("Compacted both stores.");
    Ok(())
}

use anyhow::Result;
use loghive_store::Database;

pub fn handle(db: &Database, json: bool) -> Result<()> {
    let projects = db.list_projects()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projects)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects imported yet.");
        return Ok(());
    }

    for project in &projects {
        println!(
            "{:<28} {:>4} session(s)  [{}]  {}",
            project.name,
            project.session_count,
            project.providers.join(", "),
            project.id
        );
    }
    Ok(())
}

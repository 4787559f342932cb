use anyhow::Result;
use loghive_store::Database;
use loghive_types::truncate_title;

pub fn handle(db: &Database, project: Option<&str>, json: bool) -> Result<()> {
    let sessions = match project {
        Some(project_id) => db.list_sessions(project_id)?,
        None => db.list_all_sessions()?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found.");
        return Ok(());
    }

    for session in &sessions {
        println!(
            "#{:<6} {:<10} {:<44} {:>4} msg  {}",
            session.id,
            session.provider,
            truncate_title(&session.title, 44),
            session.message_count,
            session.updated_at.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

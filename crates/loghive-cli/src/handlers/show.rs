use anyhow::Result;
use loghive_store::Database;
use loghive_types::blocks_to_text;

pub fn handle(db: &Database, session_id: i64, json: bool) -> Result<()> {
    let Some(session) = db.get_session_by_id(session_id)? else {
        anyhow::bail!("session {} not found", session_id);
    };
    let messages = db.get_messages(session_id)?;

    if json {
        let value = serde_json::json!({
            "session": {
                "id": session.id,
                "project_id": session.project_id,
                "provider": session.provider,
                "external_id": session.external_id,
                "title": session.title,
                "version": session.version,
                "git_branch": session.git_branch,
                "cwd": session.cwd,
                "models": session.models,
                "message_count": session.message_count,
                "created_at": session.created_at,
                "updated_at": session.updated_at,
            },
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!(
        "{} ({}/{})",
        session.title, session.provider, session.external_id
    );
    if let Some(cwd) = &session.cwd {
        println!("cwd: {}", cwd);
    }
    if let Some(branch) = &session.git_branch {
        println!("branch: {}", branch);
    }
    if !session.models.is_empty() {
        let models: Vec<String> = session
            .models
            .iter()
            .map(|(model, count)| format!("{} ({})", model, count))
            .collect();
        println!("models: {}", models.join(", "));
    }

    for message in &messages {
        println!();
        print!("[{}] {}", message.seq, message.card_type.as_str());
        if message.is_error {
            print!(" (error)");
        }
        println!("  {}", message.timestamp);
        if let Some(title) = &message.title {
            println!("{}", title);
        }
        if let Some(subtitle) = &message.subtitle {
            println!("{}", subtitle);
        }
        let text = blocks_to_text(&message.content);
        for line in text.lines() {
            println!("  {}", line);
        }
    }
    Ok(())
}

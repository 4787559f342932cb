use anyhow::Result;
use loghive_search::SearchIndex;

pub fn handle(
    index: &SearchIndex,
    query: &str,
    project: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let hits = match project {
        Some(name) => index.search_by_project(name, query, limit)?,
        None => index.search(query, limit)?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&hits)?);
        return Ok(());
    }

    if hits.is_empty() {
        println!("No matches.");
        return Ok(());
    }

    for hit in &hits {
        println!(
            "#{:<6} {:<11} {}  {}",
            hit.session_id,
            hit.card_type,
            hit.timestamp,
            hit.snippet.replace(['\n', '\r'], " ")
        );
    }
    Ok(())
}

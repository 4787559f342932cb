use loghive_search::{Error, MAX_SEARCH_RESULTS, SearchDocument, SearchIndex, WRITE_BATCH_SIZE};

fn doc<'a>(session_id: i64, body: &'a str, title: &'a str, project: &'a str) -> SearchDocument<'a> {
    SearchDocument {
        session_id,
        project_id: "p1",
        card_type: "user",
        session_title: title,
        project_name: project,
        timestamp: "2025-04-01T08:00:00Z",
        body,
    }
}

#[test]
fn finds_substrings_in_paths_and_identifiers() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(
            1,
            &[
                doc(1, "edited src/handlers/auth.rs line 40", "auth work", "api"),
                doc(1, "ran cargo fmt", "auth work", "api"),
            ],
        )
        .unwrap();

    // Trigram tokenization matches mid-token substrings, slashes and dots
    // included.
    assert_eq!(index.search("handlers/auth", 10).unwrap().len(), 1);
    assert_eq!(index.search("auth.rs", 10).unwrap().len(), 1);
    assert_eq!(index.search("argo fm", 10).unwrap().len(), 1);
    assert!(index.search("tokio", 10).unwrap().is_empty());
}

#[test]
fn snippet_highlights_the_match() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(1, &[doc(1, "the panic came from unwrap", "t", "api")])
        .unwrap();

    let hits = index.search("panic", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0].snippet.contains("[panic]"), "{}", hits[0].snippet);
    assert_eq!(hits[0].session_id, 1);
    assert_eq!(hits[0].card_type, "user");
}

#[test]
fn quoted_query_is_literal_not_syntax() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(1, &[doc(1, r#"print("boot OK") added"#, "t", "api")])
        .unwrap();

    // AND / OR / NEAR are matched as text, never parsed as operators.
    assert!(index.search("boot OK", 10).unwrap().len() == 1);
    assert!(index.search(r#"("boot"#, 10).unwrap().len() == 1);
    assert!(index.search("boot AND missing", 10).unwrap().is_empty());
}

#[test]
fn short_or_empty_query_is_typed_error() {
    let index = SearchIndex::open_in_memory().unwrap();
    assert!(matches!(index.search("ab", 10), Err(Error::InvalidQuery(_))));
    assert!(matches!(index.search("", 10), Err(Error::InvalidQuery(_))));
}

#[test]
fn result_cap_overrides_caller_limit() {
    let index = SearchIndex::open_in_memory().unwrap();
    let bodies: Vec<String> = (0..150).map(|i| format!("needle row {}", i)).collect();
    let docs: Vec<SearchDocument> = bodies.iter().map(|b| doc(1, b, "t", "api")).collect();
    index.replace_session(1, &docs).unwrap();

    let hits = index.search("needle", 500).unwrap();
    assert_eq!(hits.len(), MAX_SEARCH_RESULTS);
}

#[test]
fn replacement_spanning_many_batches_lands_every_row() {
    let index = SearchIndex::open_in_memory().unwrap();
    let old: Vec<String> = (0..(WRITE_BATCH_SIZE * 2 + 50))
        .map(|i| format!("alpha row {:04}", i))
        .collect();
    let docs: Vec<SearchDocument> = old.iter().map(|b| doc(1, b, "t", "api")).collect();
    index.replace_session(1, &docs).unwrap();

    let new: Vec<String> = (0..(WRITE_BATCH_SIZE * 2 + 1))
        .map(|i| format!("beta row {:04}", i))
        .collect();
    let docs: Vec<SearchDocument> = new.iter().map(|b| doc(1, b, "t", "api")).collect();
    index.replace_session(1, &docs).unwrap();

    // Rows from every commit slice are present, including the trailing
    // partial one, and no stale row survives the delete.
    assert_eq!(index.search("beta row 0000", 10).unwrap().len(), 1);
    assert_eq!(index.search("beta row 0200", 10).unwrap().len(), 1);
    assert_eq!(index.search("beta row 0400", 10).unwrap().len(), 1);
    assert!(index.search("alpha row", 10).unwrap().is_empty());
}

#[test]
fn replace_session_removes_stale_rows() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(1, &[doc(1, "old body text", "t", "api")])
        .unwrap();
    index
        .replace_session(1, &[doc(1, "new body text", "t", "api")])
        .unwrap();

    assert!(index.search("old body", 10).unwrap().is_empty());
    assert_eq!(index.search("new body", 10).unwrap().len(), 1);
}

#[test]
fn delete_by_session_scopes_to_one_session() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(1, &[doc(1, "shared phrase here", "t", "api")])
        .unwrap();
    index
        .replace_session(2, &[doc(2, "shared phrase here", "t", "api")])
        .unwrap();

    index.delete_by_session(1).unwrap();
    let hits = index.search("shared phrase", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].session_id, 2);
}

#[test]
fn project_filter_narrows_results() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(1, &[doc(1, "deploy script fixed", "t", "api")])
        .unwrap();
    index
        .replace_session(2, &[doc(2, "deploy script fixed", "t", "webapp")])
        .unwrap();

    let hits = index.search_by_project("webapp", "deploy", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].session_id, 2);
}

#[test]
fn body_match_outranks_title_match() {
    let index = SearchIndex::open_in_memory().unwrap();
    index
        .replace_session(
            1,
            &[doc(1, "nothing relevant", "migration planning", "api")],
        )
        .unwrap();
    index
        .replace_session(2, &[doc(2, "wrote the migration runner", "t", "api")])
        .unwrap();

    let hits = index.search("migration", 10).unwrap();
    assert_eq!(hits.len(), 2);
    assert_eq!(hits[0].session_id, 2);
}

#[test]
fn persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("search.db");
    {
        let index = SearchIndex::open(&path).unwrap();
        index
            .replace_session(1, &[doc(1, "durable entry", "t", "api")])
            .unwrap();
        index.optimize().unwrap();
    }
    let index = SearchIndex::open(&path).unwrap();
    assert_eq!(index.search("durable", 10).unwrap().len(), 1);
}

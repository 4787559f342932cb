use loghive_testing::fixtures;
use loghive_testing::world::TestWorld;
use predicates::prelude::*;

#[test]
fn import_then_search_end_to_end() {
    let world = TestWorld::new().with_provider("claude_code");
    fixtures::claude_session(world.log_root("claude_code"), "/home/dev/api", "s-cli-1")
        .expect("fixture");

    world
        .command()
        .arg("import")
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 1 session(s)"));

    assert!(world.primary_db().exists());
    assert!(world.search_db().exists());

    let output = world
        .command()
        .args(["search", "token clock", "--json"])
        .output()
        .expect("search run");
    assert!(
        output.status.success(),
        "search failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let hits: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("json output");
    let hits = hits.as_array().expect("array of hits");
    assert_eq!(hits.len(), 1);
    assert!(hits[0]["snippet"].as_str().unwrap().contains("[token clock]"));
}

#[test]
fn projects_sessions_and_show_cover_the_read_path() {
    let world = TestWorld::new()
        .with_provider("claude_code")
        .with_provider("codex");
    fixtures::claude_session(world.log_root("claude_code"), "/home/dev/api", "s-cli-2")
        .expect("claude fixture");
    fixtures::codex_session(world.log_root("codex"), "/home/dev/webapp", "c-cli-2")
        .expect("codex fixture");

    world.command().arg("import").assert().success();

    let output = world
        .command()
        .args(["projects", "--json"])
        .output()
        .expect("projects run");
    let projects: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("json output");
    let projects = projects.as_array().expect("array of projects");
    assert_eq!(projects.len(), 2);

    let output = world
        .command()
        .args(["sessions", "--json"])
        .output()
        .expect("sessions run");
    let sessions: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("json output");
    let sessions = sessions.as_array().expect("array of sessions");
    assert_eq!(sessions.len(), 2);

    let session_id = sessions[0]["id"].as_i64().expect("numeric session id");
    world
        .command()
        .args(["show", &session_id.to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "({}/",
            sessions[0]["provider"].as_str().unwrap()
        )));

    // Scoped listing only returns the named project's sessions.
    let project_id = sessions[0]["project_id"].as_str().expect("project id");
    let output = world
        .command()
        .args(["sessions", "--project", project_id, "--json"])
        .output()
        .expect("scoped sessions run");
    let scoped: serde_json::Value =
        serde_json::from_str(&String::from_utf8_lossy(&output.stdout)).expect("json output");
    assert_eq!(scoped.as_array().unwrap().len(), 1);
}

#[test]
fn empty_workspace_reads_cleanly() {
    let world = TestWorld::new();

    world
        .command()
        .arg("sessions")
        .assert()
        .success()
        .stdout(predicate::str::contains("No sessions found."));

    world
        .command()
        .args(["search", "anything"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matches."));
}

#[test]
fn short_query_is_rejected() {
    let world = TestWorld::new();

    world
        .command()
        .args(["search", "ab"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 3 characters"));
}

#[test]
fn missing_session_show_fails_with_context() {
    let world = TestWorld::new();

    world
        .command()
        .args(["show", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("session 42 not found"));
}

#[test]
fn compact_rebuild_restores_search_rows() {
    let world = TestWorld::new().with_provider("claude_code");
    fixtures::claude_session(world.log_root("claude_code"), "/home/dev/api", "s-cli-3")
        .expect("fixture");
    world.command().arg("import").assert().success();

    // Drop the derived index file entirely; rebuild repopulates it from the
    // primary store.
    std::fs::remove_file(world.search_db()).expect("remove search db");

    world
        .command()
        .args(["compact", "--rebuild"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Reindexed"));

    world
        .command()
        .args(["search", "token clock"])
        .assert()
        .success()
        .stdout(predicate::str::contains("token clock"));
}

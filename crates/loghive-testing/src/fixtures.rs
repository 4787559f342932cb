//! Fixture builders that lay realistic provider session trees into a log
//! root, one function per provider format.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Encode a project path the way Claude Code names its project directories:
/// `/Users/jane/myproj` -> `-Users-jane-myproj`.
pub fn claude_project_dir(project_path: &str) -> String {
    project_path.replace(['/', '.'], "-")
}

/// A Claude Code JSONL session with a user turn, an assistant tool call and
/// the asynchronous tool result.
pub fn claude_session(log_root: &Path, project_path: &str, session_id: &str) -> Result<PathBuf> {
    let dir = log_root.join(claude_project_dir(project_path));
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("{session_id}.jsonl"));
    let lines = [
        format!(
            r#"{{"type":"user","sessionId":"{session_id}","timestamp":"2025-04-01T08:00:00Z","cwd":"{project_path}","gitBranch":"main","version":"1.0.44","message":{{"content":"fix the failing login test"}}}}"#
        ),
        format!(
            r#"{{"type":"assistant","sessionId":"{session_id}","timestamp":"2025-04-01T08:00:05Z","message":{{"model":"claude-sonnet-4","content":[{{"type":"tool_use","id":"toolu_01","name":"Bash","input":{{"command":"cargo test login"}}}}]}}}}"#
        ),
        format!(
            r#"{{"type":"user","sessionId":"{session_id}","timestamp":"2025-04-01T08:00:09Z","message":{{"content":[{{"type":"tool_result","tool_use_id":"toolu_01","content":"1 failed: test_login_expiry"}}]}}}}"#
        ),
        format!(
            r#"{{"type":"assistant","sessionId":"{session_id}","timestamp":"2025-04-01T08:00:20Z","message":{{"model":"claude-sonnet-4","content":[{{"type":"text","text":"The token clock was frozen; fixed in auth.rs."}}]}}}}"#
        ),
    ];
    fs::write(&path, lines.join("\n") + "\n")?;
    Ok(path)
}

/// A Codex rollout under the dated directory layout.
pub fn codex_session(log_root: &Path, cwd: &str, external_id: &str) -> Result<PathBuf> {
    let dir = log_root.join("2025/04/01");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("rollout-2025-04-01T08-00-00-{external_id}.jsonl"));
    let lines = [
        format!(
            r#"{{"timestamp":"2025-04-01T08:00:00Z","type":"session_meta","payload":{{"id":"{external_id}","timestamp":"2025-04-01T08:00:00Z","cwd":"{cwd}","cli_version":"0.42.0","git":{{"branch":"main"}}}}}}"#
        ),
        r#"{"timestamp":"2025-04-01T08:00:01Z","type":"turn_context","payload":{"model":"gpt-5-codex"}}"#.to_string(),
        r#"{"timestamp":"2025-04-01T08:00:02Z","type":"response_item","payload":{"type":"message","role":"user","content":[{"type":"input_text","text":"profile the slow endpoint"}]}}"#.to_string(),
        r#"{"timestamp":"2025-04-01T08:00:08Z","type":"response_item","payload":{"type":"function_call","name":"shell","arguments":"{\"command\":\"cargo flamegraph\"}","call_id":"call_01"}}"#.to_string(),
        r#"{"timestamp":"2025-04-01T08:00:20Z","type":"response_item","payload":{"type":"function_call_output","call_id":"call_01","output":{"content":"flamegraph.svg written","success":true}}}"#.to_string(),
        r#"{"timestamp":"2025-04-01T08:00:25Z","type":"response_item","payload":{"type":"message","role":"assistant","content":[{"type":"output_text","text":"Most time is spent in serde deserialization."}]}}"#.to_string(),
    ];
    fs::write(&path, lines.join("\n") + "\n")?;
    Ok(path)
}

/// A Gemini aggregated session document under a project hash directory.
pub fn gemini_session(log_root: &Path, workspace_dir: &str, session_id: &str) -> Result<PathBuf> {
    let dir = log_root.join("9f86d081/chats");
    fs::create_dir_all(&dir)?;
    let path = dir.join(format!("session-{session_id}.json"));
    let body = format!(
        r##"{{
  "sessionId": "{session_id}",
  "startTime": "2025-04-01T08:00:00Z",
  "lastUpdated": "2025-04-01T08:10:00Z",
  "workspaceDir": "{workspace_dir}",
  "messages": [
    {{"type": "user", "id": "m1", "timestamp": "2025-04-01T08:00:00Z", "content": "summarize the README"}},
    {{"type": "gemini", "id": "m2", "timestamp": "2025-04-01T08:00:10Z",
     "content": "Done, see below.", "model": "gemini-2.5-pro",
     "toolCalls": [{{"id": "t1", "name": "read_file",
                    "args": {{"path": "README.md"}},
                    "resultDisplay": "# myproj\\nA tool.", "status": "success"}}]}}
  ]
}}"##
    );
    fs::write(&path, body)?;
    Ok(path)
}

/// An OpenCode storage tree: session info, one message dir, part files.
pub fn opencode_session(log_root: &Path, directory: &str, session_id: &str) -> Result<PathBuf> {
    let info = log_root.join(format!("session/{session_id}.json"));
    fs::create_dir_all(info.parent().unwrap())?;
    fs::write(
        &info,
        format!(
            r#"{{"id":"{session_id}","directory":"{directory}","version":"0.6.3","time":{{"created":1743494400000,"updated":1743495000000}}}}"#
        ),
    )?;

    let message_dir = log_root.join(format!("message/{session_id}"));
    fs::create_dir_all(&message_dir)?;
    fs::write(
        message_dir.join("msg_01.json"),
        r#"{"id":"msg_01","role":"user","time":{"created":1743494400000}}"#,
    )?;
    fs::write(
        message_dir.join("msg_02.json"),
        r#"{"id":"msg_02","role":"assistant","time":{"created":1743494410000},"modelID":"claude-sonnet-4"}"#,
    )?;

    let part_1 = log_root.join("part/msg_01");
    fs::create_dir_all(&part_1)?;
    fs::write(
        part_1.join("prt_01.json"),
        r#"{"type":"text","text":"rename Config to Settings"}"#,
    )?;
    let part_2 = log_root.join("part/msg_02");
    fs::create_dir_all(&part_2)?;
    fs::write(
        part_2.join("prt_01.json"),
        r#"{"type":"tool","callID":"call_9","tool":"grep","state":{"status":"completed","input":{"pattern":"Config"},"output":"12 matches"}}"#,
    )?;
    fs::write(
        part_2.join("prt_02.json"),
        r#"{"type":"text","text":"Renamed in all 12 places."}"#,
    )?;
    Ok(info)
}

/// An Amp thread file.
pub fn amp_thread(log_root: &Path, initial_directory: &str, thread_id: &str) -> Result<PathBuf> {
    fs::create_dir_all(log_root)?;
    let path = log_root.join(format!("{thread_id}.json"));
    let body = format!(
        r#"{{
  "id": "{thread_id}",
  "created": 1743494400000,
  "title": "tighten the linter config",
  "env": {{"initialDirectory": "{initial_directory}"}},
  "messages": [
    {{"role": "user", "meta": {{"sentAt": 1743494400000}},
     "content": [{{"type": "text", "text": "enable pedantic clippy lints"}}]}},
    {{"role": "assistant", "meta": {{"sentAt": 1743494410000, "model": "claude-sonnet-4"}},
     "content": [{{"type": "text", "text": "Enabled, 14 new warnings to triage."}}]}}
  ]
}}"#
    );
    fs::write(&path, body)?;
    Ok(path)
}

/// A Cline task directory with conversation history and metadata.
pub fn cline_task(log_root: &Path, cwd: &str, task_id: &str) -> Result<PathBuf> {
    let dir = log_root.join(task_id);
    fs::create_dir_all(&dir)?;
    fs::write(
        dir.join("task_metadata.json"),
        format!(r#"{{"cwd_on_task_initialization":"{cwd}","model":"claude-sonnet-4"}}"#),
    )?;
    fs::write(
        dir.join("api_conversation_history.json"),
        r#"[
  {"role": "user", "ts": 1743494400000, "content": [
    {"type": "text", "text": "<task>\nadd a healthcheck route\n</task>"}]},
  {"role": "assistant", "ts": 1743494410000, "content": [
    {"type": "text", "text": "Added GET /healthz returning 200."}]}
]"#,
    )?;
    Ok(dir)
}

/// A Copilot CLI session directory with its state.json timeline.
pub fn copilot_session(log_root: &Path, cwd: &str, session_id: &str) -> Result<PathBuf> {
    let dir = log_root.join(session_id);
    fs::create_dir_all(&dir)?;
    let path = dir.join("state.json");
    let body = format!(
        r#"{{
  "sessionId": "{session_id}",
  "startTime": "2025-04-01T08:00:00Z",
  "cwd": "{cwd}",
  "timeline": [
    {{"type": "user.message", "timestamp": "2025-04-01T08:00:00Z",
     "content": "bump the docker base image"}},
    {{"type": "assistant.message", "timestamp": "2025-04-01T08:00:10Z",
     "content": "Bumped to bookworm-slim, build passes.", "model": "gpt-5"}}
  ]
}}"#
    );
    fs::write(&path, body)?;
    Ok(path)
}

/// Pin a fixture file's mtime, for tests exercising filesystem-time
/// fallbacks.
pub fn set_mtime(path: &Path, epoch_secs: i64) -> Result<()> {
    let time = filetime::FileTime::from_unix_time(epoch_secs, 0);
    filetime::set_file_mtime(path, time)?;
    Ok(())
}

use serde_json::Value;

use loghive_types::{
    ModelCounter, ParsedMessage, SessionDetail, SessionMetadata, ToolResult, correlate,
    epoch_to_rfc3339, truncate_title,
};

use super::schema::{AmpBlock, Thread, ThreadMessage};
use crate::coerce::{TITLE_MAX_CHARS, first_user_title, placeholder_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct AmpNormalizer;

impl SessionNormalizer for AmpNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let bytes = std::fs::read(&raw.root).ok()?;
        let thread: Thread = serde_json::from_slice(&bytes).ok()?;

        let created_at = thread
            .created
            .and_then(epoch_to_rfc3339)
            .or_else(|| raw.fs_created.clone());

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut models = ModelCounter::new();
        let mut last_timestamp = created_at.clone();

        for entry in &thread.messages {
            let timestamp = entry
                .meta
                .sent_at
                .and_then(epoch_to_rfc3339)
                .or_else(|| created_at.clone())
                .unwrap_or_default();
            last_timestamp = Some(timestamp.clone());
            if entry.role == "assistant"
                && let Some(model) = &entry.meta.model
            {
                models.record(model);
            }
            push_blocks(&mut messages, entry, &timestamp);
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        let session_id = thread.id.clone().unwrap_or_else(|| raw.external_id.clone());
        let metadata = SessionMetadata {
            cwd: thread
                .env
                .initial_directory
                .clone()
                .filter(|d| !d.is_empty()),
            models: models.into_sorted(),
            created_at: created_at.clone(),
            modified_at: last_timestamp.or_else(|| raw.fs_modified.clone()),
            message_count: messages.len(),
            ..Default::default()
        };

        // First genuine user message wins, like every other normalizer; the
        // thread's own title only covers sessions without user text.
        let title = first_user_title(&messages)
            .or_else(|| {
                thread
                    .title
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(|t| truncate_title(t, TITLE_MAX_CHARS))
            })
            .unwrap_or_else(|| placeholder_title("amp", &session_id));

        Some(SessionDetail {
            session_id,
            title,
            messages,
            metadata,
        })
    }
}

fn push_blocks(messages: &mut Vec<ParsedMessage>, entry: &ThreadMessage, timestamp: &str) {
    for block in &entry.content {
        match block {
            AmpBlock::Text { text } => {
                if text.trim().is_empty() {
                    continue;
                }
                let message = if entry.role == "user" {
                    ParsedMessage::User {
                        timestamp: timestamp.to_string(),
                        content: vec![loghive_types::ContentBlock::text(text.clone())],
                    }
                } else {
                    ParsedMessage::AssistantText {
                        timestamp: timestamp.to_string(),
                        content: vec![loghive_types::ContentBlock::markdown(text.clone())],
                    }
                };
                messages.push(message);
            }
            AmpBlock::Thinking { thinking } => {
                if !thinking.trim().is_empty() {
                    messages.push(ParsedMessage::AssistantThinking {
                        timestamp: timestamp.to_string(),
                        thinking: thinking.clone(),
                    });
                }
            }
            AmpBlock::ToolUse {
                id,
                name,
                input,
                run,
            } => {
                let mut results = Vec::new();
                if let Some(run) = run
                    && let Some(output) = &run.output
                {
                    let output = reduce_output(output);
                    if !output.is_empty() {
                        results.push(ToolResult {
                            output,
                            is_error: matches!(
                                run.status.as_deref(),
                                Some("error") | Some("failed")
                            ),
                            tool_call_id: id.clone(),
                        });
                    }
                }
                messages.push(ParsedMessage::ToolUse {
                    timestamp: timestamp.to_string(),
                    tool_name: name.clone(),
                    tool_call_id: id.clone(),
                    input: value_to_input_map(input),
                    results,
                });
            }
            AmpBlock::Unknown => {}
        }
    }
}

fn reduce_output(output: &Value) -> String {
    match output {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from(json: &str) -> (tempfile::TempDir, RawSession) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("T-9f2.json");
        std::fs::write(&path, json).unwrap();
        (dir, RawSession::from_path("T-9f2".to_string(), path))
    }

    #[test]
    fn parses_thread_with_inline_tool_run() {
        let (_dir, raw) = raw_from(
            r#"{
              "id": "T-9f2",
              "created": 1743500000000,
              "title": "speed up the parser",
              "env": {"initialDirectory": "/home/mia/parser"},
              "messages": [
                {"role": "user", "meta": {"sentAt": 1743500000000},
                 "content": [{"type": "text", "text": "why is parse() slow?"}]},
                {"role": "assistant", "meta": {"sentAt": 1743500008000, "model": "claude-sonnet-4"},
                 "content": [
                   {"type": "thinking", "thinking": "profile it first"},
                   {"type": "tool_use", "id": "tu_1", "name": "Bash",
                    "input": {"cmd": "cargo bench"},
                    "run": {"status": "success", "output": "parse: 48ms"}},
                   {"type": "text", "text": "allocation in the hot loop"}
                 ]}
              ]
            }"#,
        );

        let detail = AmpNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.session_id, "T-9f2");
        // The thread title loses to the first user message.
        assert_eq!(detail.title, "why is parse() slow?");
        assert_eq!(detail.metadata.cwd.as_deref(), Some("/home/mia/parser"));
        assert_eq!(
            detail.metadata.models,
            vec![("claude-sonnet-4".to_string(), 1)]
        );
        assert_eq!(detail.messages.len(), 4);
        match &detail.messages[2] {
            ParsedMessage::ToolUse { input, results, .. } => {
                assert_eq!(input["cmd"], "cargo bench");
                assert_eq!(results[0].output, "parse: 48ms");
                assert!(!results[0].is_error);
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
        assert!(
            detail
                .metadata
                .created_at
                .as_deref()
                .unwrap()
                .starts_with("2025-04-01")
        );
    }

    #[test]
    fn untitled_thread_takes_first_user_message() {
        let (_dir, raw) = raw_from(
            r#"{"created": 1743500000000, "messages": [
                {"role": "user", "content": [{"type": "text", "text": "list open ports"}]}]}"#,
        );
        let detail = AmpNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.title, "list open ports");
        // No payload id either, so the filename stem stands in.
        assert_eq!(detail.session_id, "T-9f2");
    }

    #[test]
    fn thread_title_covers_sessions_without_user_text() {
        let (_dir, raw) = raw_from(
            r#"{"id": "T-bg", "title": "nightly maintenance", "messages": [
                {"role": "assistant", "content": [{"type": "text", "text": "rotated the logs"}]}]}"#,
        );
        let detail = AmpNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.title, "nightly maintenance");
    }

    #[test]
    fn failed_run_marks_result_as_error() {
        let (_dir, raw) = raw_from(
            r#"{"messages": [
                {"role": "assistant", "content": [
                  {"type": "tool_use", "id": "tu_2", "name": "read_file",
                   "input": {"path": "/gone"},
                   "run": {"status": "failed", "output": "ENOENT"}}]}]}"#,
        );
        let detail = AmpNormalizer.parse(&raw).unwrap();
        match &detail.messages[0] {
            ParsedMessage::ToolUse { results, .. } => assert!(results[0].is_error),
            other => panic!("expected tool_use, got {other:?}"),
        }
    }

    #[test]
    fn empty_thread_is_none() {
        let (_dir, raw) = raw_from(r#"{"id": "T-x", "messages": []}"#);
        assert!(AmpNormalizer.parse(&raw).is_none());
    }
}

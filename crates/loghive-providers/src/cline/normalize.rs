use serde_json::Value;

use loghive_types::{
    ContentBlock, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata, ToolResult,
    blocks_to_text, correlate, epoch_to_rfc3339,
};

use super::schema::{ApiBlock, ApiMessage, TaskMetadata};
use crate::coerce::{coerce_content, derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct ClineNormalizer;

impl SessionNormalizer for ClineNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let history_path = raw.root.join("api_conversation_history.json");
        let bytes = std::fs::read(&history_path).ok()?;
        let entries: Vec<ApiMessage> = serde_json::from_slice(&bytes).ok()?;

        let metadata_file: TaskMetadata = std::fs::read(raw.root.join("task_metadata.json"))
            .ok()
            .and_then(|b| serde_json::from_slice(&b).ok())
            .unwrap_or_default();

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut models = ModelCounter::new();
        let mut first_ts: Option<String> = None;
        let mut last_ts: Option<String> = None;

        for entry in &entries {
            let timestamp = entry
                .ts
                .and_then(epoch_to_rfc3339)
                .or_else(|| raw.fs_modified.clone())
                .unwrap_or_default();
            if first_ts.is_none() {
                first_ts = Some(timestamp.clone());
            }
            last_ts = Some(timestamp.clone());
            if entry.role == "assistant"
                && let Some(model) = &metadata_file.model
            {
                models.record(model);
            }
            push_entry(&mut messages, entry, &timestamp);
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        let metadata = SessionMetadata {
            cwd: metadata_file.cwd.clone().filter(|c| !c.is_empty()),
            models: models.into_sorted(),
            created_at: first_ts.or_else(|| raw.fs_created.clone()),
            modified_at: last_ts.or_else(|| raw.fs_modified.clone()),
            message_count: messages.len(),
            ..Default::default()
        };

        let title = derive_title(&messages, "cline", &raw.external_id);
        Some(SessionDetail {
            session_id: raw.external_id.clone(),
            title,
            messages,
            metadata,
        })
    }
}

fn push_entry(messages: &mut Vec<ParsedMessage>, entry: &ApiMessage, timestamp: &str) {
    let blocks: Vec<ApiBlock> = match &entry.content {
        Value::String(s) => vec![ApiBlock::Text { text: s.clone() }],
        Value::Array(items) => items
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
        _ => Vec::new(),
    };

    let mut text_blocks: Vec<ContentBlock> = Vec::new();
    for block in blocks {
        match block {
            ApiBlock::Text { text } => {
                if let Some(text) = strip_task_markup(&text) {
                    let block = if entry.role == "user" {
                        ContentBlock::text(text)
                    } else {
                        ContentBlock::markdown(text)
                    };
                    text_blocks.push(block);
                }
            }
            ApiBlock::Thinking { thinking } => {
                if !thinking.trim().is_empty() {
                    messages.push(ParsedMessage::AssistantThinking {
                        timestamp: timestamp.to_string(),
                        thinking,
                    });
                }
            }
            ApiBlock::ToolUse { id, name, input } => {
                messages.push(ParsedMessage::ToolUse {
                    timestamp: timestamp.to_string(),
                    tool_name: name,
                    tool_call_id: id,
                    input: value_to_input_map(&input),
                    results: Vec::new(),
                });
            }
            ApiBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            } => {
                let output = blocks_to_text(&coerce_content(&content));
                messages.push(ParsedMessage::ToolResult {
                    timestamp: timestamp.to_string(),
                    tool_call_id: tool_use_id.clone(),
                    output: vec![ContentBlock::code(output)],
                    is_error: is_error.unwrap_or(false),
                });
            }
            ApiBlock::Unknown => {}
        }
    }

    if !text_blocks.is_empty() {
        let message = if entry.role == "user" {
            ParsedMessage::User {
                timestamp: timestamp.to_string(),
                content: text_blocks,
            }
        } else {
            ParsedMessage::AssistantText {
                timestamp: timestamp.to_string(),
                content: text_blocks,
            }
        };
        messages.push(message);
    }
}

/// Cline wraps the user's request in `<task>` tags and appends an
/// `<environment_details>` dump to every turn. The dump is machine context,
/// not conversation; the tags are noise around the real prompt.
fn strip_task_markup(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.starts_with("<environment_details>") {
        return None;
    }
    let unwrapped = trimmed
        .strip_prefix("<task>")
        .and_then(|t| t.strip_suffix("</task>"))
        .map(str::trim)
        .unwrap_or(trimmed);
    if unwrapped.is_empty() {
        None
    } else {
        Some(unwrapped.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn task_dir(history: &str, metadata: Option<&str>) -> (tempfile::TempDir, RawSession) {
        let dir = tempfile::tempdir().unwrap();
        let task = dir.path().join("1743500000000");
        fs::create_dir_all(&task).unwrap();
        fs::write(task.join("api_conversation_history.json"), history).unwrap();
        if let Some(metadata) = metadata {
            fs::write(task.join("task_metadata.json"), metadata).unwrap();
        }
        let raw = RawSession::from_path("1743500000000".to_string(), task);
        (dir, raw)
    }

    #[test]
    fn parses_task_history_and_correlates_results() {
        let (_dir, raw) = task_dir(
            r#"[
              {"role": "user", "ts": 1743500000000, "content": [
                {"type": "text", "text": "<task>\nadd a retry flag\n</task>"},
                {"type": "text", "text": "<environment_details>\n# cwd\n</environment_details>"}]},
              {"role": "assistant", "ts": 1743500006000, "content": [
                {"type": "tool_use", "id": "tu_1", "name": "read_file",
                 "input": {"path": "src/cli.rs"}}]},
              {"role": "user", "ts": 1743500007000, "content": [
                {"type": "tool_result", "tool_use_id": "tu_1",
                 "content": "pub struct Args;"}]},
              {"role": "assistant", "ts": 1743500012000, "content": [
                {"type": "text", "text": "added `--retry`"}]}
            ]"#,
            Some(r#"{"cwd_on_task_initialization": "/home/lee/cli", "model": "claude-sonnet-4"}"#),
        );

        let detail = ClineNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.session_id, "1743500000000");
        assert_eq!(detail.title, "add a retry flag");
        assert_eq!(detail.metadata.cwd.as_deref(), Some("/home/lee/cli"));
        assert_eq!(
            detail.metadata.models,
            vec![("claude-sonnet-4".to_string(), 2)]
        );
        // user, tool_use (result folded in), assistant text
        assert_eq!(detail.messages.len(), 3);
        match &detail.messages[1] {
            ParsedMessage::ToolUse { results, .. } => {
                assert_eq!(results.len(), 1);
                assert_eq!(results[0].output, "pub struct Args;");
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
    }

    #[test]
    fn missing_metadata_file_still_parses() {
        let (_dir, raw) = task_dir(
            r#"[{"role": "user", "ts": 1743500000000,
                 "content": [{"type": "text", "text": "hello"}]}]"#,
            None,
        );
        let detail = ClineNormalizer.parse(&raw).unwrap();
        assert!(detail.metadata.cwd.is_none());
        assert!(detail.metadata.models.is_empty());
    }

    #[test]
    fn string_content_becomes_one_text_block() {
        let (_dir, raw) = task_dir(
            r#"[{"role": "assistant", "ts": 1743500000000, "content": "done"}]"#,
            None,
        );
        let detail = ClineNormalizer.parse(&raw).unwrap();
        assert!(matches!(
            &detail.messages[0],
            ParsedMessage::AssistantText { .. }
        ));
    }

    #[test]
    fn environment_only_history_is_none() {
        let (_dir, raw) = task_dir(
            r#"[{"role": "user", "content": [
                {"type": "text", "text": "<environment_details>x</environment_details>"}]}]"#,
            None,
        );
        assert!(ClineNormalizer.parse(&raw).is_none());
    }
}

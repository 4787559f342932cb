use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};

use loghive_types::{
    ContentBlock, InfoStyle, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata,
    correlate, truncate_title,
};

use super::schema::{ClaudeBlock, ClaudeRecord, EnvelopeRecord};
use crate::coerce::{coerce_content, derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct ClaudeCodeNormalizer;

impl SessionNormalizer for ClaudeCodeNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let file = File::open(&raw.root).ok()?;
        let reader = BufReader::new(file);

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut metadata = SessionMetadata::default();
        let mut models = ModelCounter::new();
        let mut last_timestamp = raw.fs_modified.clone().unwrap_or_default();

        for line in reader.lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            let record: ClaudeRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(err) => {
                    // Keep the gap visible instead of silently dropping it.
                    messages.push(ParsedMessage::parse_error(
                        last_timestamp.clone(),
                        format!("malformed stream line: {}", err),
                    ));
                    continue;
                }
            };

            match record {
                ClaudeRecord::User(envelope) => {
                    if envelope.is_meta || envelope.is_sidechain {
                        continue;
                    }
                    absorb_metadata(&mut metadata, &envelope);
                    last_timestamp = envelope.timestamp.clone();
                    push_user_blocks(&mut messages, &envelope);
                }
                ClaudeRecord::Assistant(envelope) => {
                    if envelope.is_sidechain {
                        continue;
                    }
                    absorb_metadata(&mut metadata, &envelope);
                    last_timestamp = envelope.timestamp.clone();
                    if let Some(model) = &envelope.message.model {
                        models.record(model);
                    }
                    push_assistant_blocks(&mut messages, &envelope);
                }
                ClaudeRecord::Summary(_) | ClaudeRecord::Unknown => {}
            }
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        metadata.models = models.into_sorted();
        metadata.created_at = messages
            .first()
            .map(|m| m.timestamp().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| raw.fs_created.clone());
        metadata.modified_at = messages
            .last()
            .map(|m| m.timestamp().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| raw.fs_modified.clone());
        metadata.message_count = messages.len();

        let title = derive_title(&messages, "claude_code", &raw.external_id);
        Some(SessionDetail {
            session_id: raw.external_id.clone(),
            title,
            messages,
            metadata,
        })
    }
}

fn absorb_metadata(metadata: &mut SessionMetadata, envelope: &EnvelopeRecord) {
    if metadata.cwd.is_none() {
        metadata.cwd = envelope.cwd.clone().filter(|c| !c.is_empty());
    }
    if metadata.git_branch.is_none() {
        metadata.git_branch = envelope.git_branch.clone().filter(|b| !b.is_empty());
    }
    if metadata.version.is_none() {
        metadata.version = envelope.version.clone();
    }
}

fn push_user_blocks(messages: &mut Vec<ParsedMessage>, envelope: &EnvelopeRecord) {
    let timestamp = envelope.timestamp.clone();

    // String content: plain prompt, or a provider-internal control echo.
    if let Some(text) = envelope.message.content.as_str() {
        push_user_text(messages, timestamp, text);
        return;
    }

    let Some(items) = envelope.message.content.as_array() else {
        let blocks = coerce_content(&envelope.message.content);
        if blocks.is_empty() {
            messages.push(ParsedMessage::parse_error(
                timestamp,
                "user record with empty content",
            ));
        } else {
            messages.push(ParsedMessage::User {
                timestamp,
                content: blocks,
            });
        }
        return;
    };

    let mut user_blocks: Vec<ContentBlock> = Vec::new();
    for item in items {
        match serde_json::from_value::<ClaudeBlock>(item.clone()) {
            Ok(ClaudeBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            }) => {
                flush_user(messages, &timestamp, &mut user_blocks);
                messages.push(ParsedMessage::ToolResult {
                    timestamp: timestamp.clone(),
                    tool_call_id: tool_use_id,
                    output: result_blocks(&content),
                    is_error,
                });
            }
            Ok(ClaudeBlock::Text { text }) => {
                if let Some(control) = parse_control_text(&text) {
                    flush_user(messages, &timestamp, &mut user_blocks);
                    if let Some(message) = control.into_message(&timestamp) {
                        messages.push(message);
                    }
                } else if !text.trim().is_empty() {
                    user_blocks.push(ContentBlock::text(text));
                }
            }
            Ok(_) | Err(_) => {
                user_blocks.extend(coerce_content(&serde_json::json!([item])));
            }
        }
    }
    flush_user(messages, &timestamp, &mut user_blocks);
}

fn flush_user(messages: &mut Vec<ParsedMessage>, timestamp: &str, blocks: &mut Vec<ContentBlock>) {
    if !blocks.is_empty() {
        messages.push(ParsedMessage::User {
            timestamp: timestamp.to_string(),
            content: std::mem::take(blocks),
        });
    }
}

fn push_user_text(messages: &mut Vec<ParsedMessage>, timestamp: String, text: &str) {
    if let Some(control) = parse_control_text(text) {
        if let Some(message) = control.into_message(&timestamp) {
            messages.push(message);
        }
    } else if text.trim().is_empty() {
        messages.push(ParsedMessage::parse_error(
            timestamp,
            "user record with empty content",
        ));
    } else {
        messages.push(ParsedMessage::User {
            timestamp,
            content: vec![ContentBlock::text(text.to_string())],
        });
    }
}

fn push_assistant_blocks(messages: &mut Vec<ParsedMessage>, envelope: &EnvelopeRecord) {
    let timestamp = envelope.timestamp.clone();
    let Some(items) = envelope.message.content.as_array() else {
        let blocks = coerce_content(&envelope.message.content);
        if !blocks.is_empty() {
            messages.push(ParsedMessage::AssistantText {
                timestamp,
                content: blocks,
            });
        }
        return;
    };

    for item in items {
        match serde_json::from_value::<ClaudeBlock>(item.clone()) {
            Ok(ClaudeBlock::Text { text }) => {
                if !text.trim().is_empty() {
                    messages.push(ParsedMessage::AssistantText {
                        timestamp: timestamp.clone(),
                        content: vec![ContentBlock::markdown(text)],
                    });
                }
            }
            Ok(ClaudeBlock::Thinking { thinking }) => {
                messages.push(ParsedMessage::AssistantThinking {
                    timestamp: timestamp.clone(),
                    thinking,
                });
            }
            Ok(ClaudeBlock::ToolUse { id, name, input }) => {
                messages.push(ParsedMessage::ToolUse {
                    timestamp: timestamp.clone(),
                    tool_name: name,
                    tool_call_id: id,
                    input: value_to_input_map(&input),
                    results: Vec::new(),
                });
            }
            Ok(ClaudeBlock::ToolResult {
                tool_use_id,
                content,
                is_error,
            }) => {
                messages.push(ParsedMessage::ToolResult {
                    timestamp: timestamp.clone(),
                    tool_call_id: tool_use_id,
                    output: result_blocks(&content),
                    is_error,
                });
            }
            Ok(ClaudeBlock::Unknown) | Err(_) => {}
        }
    }
}

fn result_blocks(content: &serde_json::Value) -> Vec<ContentBlock> {
    if let Some(text) = content.as_str() {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![ContentBlock::code(text.to_string())];
    }
    coerce_content(content)
}

/// Provider-internal control echoes embedded in user text.
enum ControlText {
    Command { name: String, args: Option<String> },
    CommandOutput { stdout: String },
}

impl ControlText {
    fn into_message(self, timestamp: &str) -> Option<ParsedMessage> {
        match self {
            ControlText::Command { name, args } => Some(ParsedMessage::Info {
                timestamp: timestamp.to_string(),
                title: name,
                subtitle: args.map(|a| truncate_title(&a, 80)).filter(|a| !a.is_empty()),
                content: None,
                style: InfoStyle::Default,
            }),
            ControlText::CommandOutput { stdout } => {
                // Empty command-output placeholders carry no information.
                if stdout.trim().is_empty() {
                    None
                } else {
                    Some(ParsedMessage::Info {
                        timestamp: timestamp.to_string(),
                        title: "Command output".to_string(),
                        subtitle: None,
                        content: Some(vec![ContentBlock::code(stdout)]),
                        style: InfoStyle::Default,
                    })
                }
            }
        }
    }
}

fn parse_control_text(text: &str) -> Option<ControlText> {
    let trimmed = text.trim();
    if let Some(name) = tag_content(trimmed, "command-name") {
        let args = tag_content(trimmed, "command-args").filter(|a| !a.is_empty());
        return Some(ControlText::Command { name, args });
    }
    if let Some(stdout) = tag_content(trimmed, "local-command-stdout") {
        return Some(ControlText::CommandOutput { stdout });
    }
    None
}

fn tag_content(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = text.find(&open)? + open.len();
    let end = text[start..].find(&close)? + start;
    Some(text[start..end].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_from(lines: &str) -> (tempfile::TempDir, RawSession) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s1.jsonl");
        std::fs::write(&path, lines).unwrap();
        (dir, RawSession::from_path("s1".to_string(), path))
    }

    #[test]
    fn parses_user_and_assistant_stream() {
        let (_dir, raw) = raw_from(concat!(
            r#"{"type":"user","sessionId":"s1","timestamp":"2025-03-01T10:00:00Z","cwd":"/home/jane/proj","gitBranch":"main","version":"1.0.30","message":{"role":"user","content":"fix the bug"}}"#,
            "\n",
            r#"{"type":"assistant","sessionId":"s1","timestamp":"2025-03-01T10:00:05Z","message":{"role":"assistant","model":"sonnet-4","content":[{"type":"thinking","thinking":"looking"},{"type":"text","text":"done"}]}}"#,
            "\n",
        ));

        let detail = ClaudeCodeNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.session_id, "s1");
        assert_eq!(detail.title, "fix the bug");
        assert_eq!(detail.messages.len(), 3);
        assert_eq!(detail.metadata.cwd.as_deref(), Some("/home/jane/proj"));
        assert_eq!(detail.metadata.git_branch.as_deref(), Some("main"));
        assert_eq!(detail.metadata.models, vec![("sonnet-4".to_string(), 1)]);
        assert_eq!(
            detail.metadata.created_at.as_deref(),
            Some("2025-03-01T10:00:00Z")
        );
    }

    #[test]
    fn tool_use_and_result_are_correlated() {
        let (_dir, raw) = raw_from(concat!(
            r#"{"type":"assistant","timestamp":"2025-03-01T10:00:00Z","message":{"role":"assistant","content":[{"type":"tool_use","id":"c1","name":"Read","input":{"file_path":"a.rs"}}]}}"#,
            "\n",
            r#"{"type":"user","timestamp":"2025-03-01T10:00:02Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"c1","content":"file contents","is_error":false}]}}"#,
            "\n",
        ));

        let detail = ClaudeCodeNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.messages.len(), 1);
        match &detail.messages[0] {
            ParsedMessage::ToolUse {
                tool_name, results, ..
            } => {
                assert_eq!(tool_name, "Read");
                assert_eq!(results[0].output, "file contents");
            }
            other => panic!("expected correlated tool_use, got {other:?}"),
        }
    }

    #[test]
    fn command_echo_becomes_info_not_user() {
        let (_dir, raw) = raw_from(concat!(
            r#"{"type":"user","timestamp":"2025-03-01T10:00:00Z","message":{"role":"user","content":"<command-name>/compact</command-name><command-args></command-args>"}}"#,
            "\n",
            r#"{"type":"user","timestamp":"2025-03-01T10:00:01Z","message":{"role":"user","content":"<local-command-stdout></local-command-stdout>"}}"#,
            "\n",
            r#"{"type":"user","timestamp":"2025-03-01T10:00:02Z","message":{"role":"user","content":"real question"}}"#,
            "\n",
        ));

        let detail = ClaudeCodeNormalizer.parse(&raw).unwrap();
        // Command becomes info, empty stdout placeholder is dropped.
        assert_eq!(detail.messages.len(), 2);
        assert!(matches!(
            detail.messages[0],
            ParsedMessage::Info {
                style: InfoStyle::Default,
                ..
            }
        ));
        // Title skips the control echo.
        assert_eq!(detail.title, "real question");
    }

    #[test]
    fn malformed_line_leaves_error_info() {
        let (_dir, raw) = raw_from(concat!(
            r#"{"type":"user","timestamp":"2025-03-01T10:00:00Z","message":{"role":"user","content":"hello"}}"#,
            "\n",
            "this is not json\n",
        ));

        let detail = ClaudeCodeNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.messages.len(), 2);
        assert!(matches!(
            detail.messages[1],
            ParsedMessage::Info {
                style: InfoStyle::Error,
                ..
            }
        ));
    }

    #[test]
    fn meta_records_and_unknown_types_are_skipped() {
        let (_dir, raw) = raw_from(concat!(
            r#"{"type":"user","timestamp":"2025-03-01T10:00:00Z","isMeta":true,"message":{"role":"user","content":"internal"}}"#,
            "\n",
            r#"{"type":"file-history-snapshot","messageId":"m1"}"#,
            "\n",
            r#"{"type":"user","timestamp":"2025-03-01T10:00:01Z","message":{"role":"user","content":"visible"}}"#,
            "\n",
        ));

        let detail = ClaudeCodeNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.messages.len(), 1);
        assert_eq!(detail.title, "visible");
    }

    #[test]
    fn empty_stream_is_none() {
        let (_dir, raw) = raw_from("");
        assert!(ClaudeCodeNormalizer.parse(&raw).is_none());
    }
}

use std::path::Path;

use loghive_types::{
    ContentBlock, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata, ToolResult,
    correlate, epoch_to_rfc3339,
};

use super::schema::{MessageInfo, Part, SessionInfo};
use crate::coerce::{derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct OpencodeNormalizer;

impl SessionNormalizer for OpencodeNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let bytes = std::fs::read(&raw.root).ok()?;
        let info: SessionInfo = serde_json::from_slice(&bytes).ok()?;

        // session/<id>.json -> storage root is two levels up.
        let storage_root = raw.root.parent()?.parent()?;
        let message_dir = storage_root.join("message").join(&info.id);
        let part_root = storage_root.join("part");

        let mut entries = load_messages(&message_dir);
        // Message ids are time-ordered ULIDs; created time is the primary
        // key, id the tie-break.
        entries.sort_by(|a, b| {
            (a.time.created, a.id.as_str()).cmp(&(b.time.created, b.id.as_str()))
        });

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut models = ModelCounter::new();

        for entry in &entries {
            let timestamp = entry
                .time
                .created
                .and_then(epoch_to_rfc3339)
                .or_else(|| raw.fs_modified.clone())
                .unwrap_or_default();
            if entry.role == "assistant"
                && let Some(model) = &entry.model_id
            {
                models.record(model);
            }
            push_parts(&mut messages, &part_root, entry, &timestamp);
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        let metadata = SessionMetadata {
            version: info.version.clone(),
            cwd: info.directory.clone().filter(|d| !d.is_empty()),
            models: models.into_sorted(),
            created_at: info
                .time
                .created
                .and_then(epoch_to_rfc3339)
                .or_else(|| raw.fs_created.clone()),
            modified_at: info
                .time
                .updated
                .and_then(epoch_to_rfc3339)
                .or_else(|| raw.fs_modified.clone()),
            message_count: messages.len(),
            ..Default::default()
        };

        let title = derive_title(&messages, "opencode", &info.id);
        Some(SessionDetail {
            session_id: info.id,
            title,
            messages,
            metadata,
        })
    }
}

fn load_messages(message_dir: &Path) -> Vec<MessageInfo> {
    let mut entries = Vec::new();
    let Ok(dir) = std::fs::read_dir(message_dir) else {
        return entries;
    };
    for entry in dir.filter_map(|e| e.ok()) {
        let path = entry.path();
        if path.extension().is_none_or(|e| e != "json") {
            continue;
        }
        if let Ok(bytes) = std::fs::read(&path)
            && let Ok(info) = serde_json::from_slice::<MessageInfo>(&bytes)
        {
            entries.push(info);
        }
    }
    entries
}

fn push_parts(
    messages: &mut Vec<ParsedMessage>,
    part_root: &Path,
    entry: &MessageInfo,
    timestamp: &str,
) {
    let part_dir = part_root.join(&entry.id);
    let mut part_files: Vec<_> = match std::fs::read_dir(&part_dir) {
        Ok(dir) => dir
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect(),
        Err(_) => Vec::new(),
    };
    // Part ids are ULIDs too; lexicographic file order is creation order.
    part_files.sort();

    if part_files.is_empty() {
        messages.push(ParsedMessage::parse_error(
            timestamp,
            format!("message {} has no content parts", entry.id),
        ));
        return;
    }

    let mut text_blocks: Vec<ContentBlock> = Vec::new();
    let flush =
        |messages: &mut Vec<ParsedMessage>, blocks: &mut Vec<ContentBlock>, role: &str| {
            if blocks.is_empty() {
                return;
            }
            let content = std::mem::take(blocks);
            let message = if role == "user" {
                ParsedMessage::User {
                    timestamp: timestamp.to_string(),
                    content,
                }
            } else {
                ParsedMessage::AssistantText {
                    timestamp: timestamp.to_string(),
                    content,
                }
            };
            messages.push(message);
        };

    for path in part_files {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        let part: Part = match serde_json::from_slice(&bytes) {
            Ok(part) => part,
            Err(err) => {
                messages.push(ParsedMessage::parse_error(
                    timestamp,
                    format!("malformed part {}: {}", path.display(), err),
                ));
                continue;
            }
        };

        match part {
            Part::Text { text } => {
                if !text.trim().is_empty() {
                    let block = if entry.role == "user" {
                        ContentBlock::text(text)
                    } else {
                        ContentBlock::markdown(text)
                    };
                    text_blocks.push(block);
                }
            }
            Part::Reasoning { text } => {
                flush(messages, &mut text_blocks, &entry.role);
                if !text.trim().is_empty() {
                    messages.push(ParsedMessage::AssistantThinking {
                        timestamp: timestamp.to_string(),
                        thinking: text,
                    });
                }
            }
            Part::Tool {
                call_id,
                tool,
                state,
            } => {
                flush(messages, &mut text_blocks, &entry.role);
                let mut results = Vec::new();
                if let Some(output) = state.output.filter(|o| !o.is_empty()) {
                    results.push(ToolResult {
                        output,
                        is_error: state.status.as_deref() == Some("error"),
                        tool_call_id: call_id.clone(),
                    });
                }
                messages.push(ParsedMessage::ToolUse {
                    timestamp: timestamp.to_string(),
                    tool_name: tool,
                    tool_call_id: call_id,
                    input: value_to_input_map(&state.input),
                    results,
                });
            }
            Part::Unknown => {}
        }
    }
    flush(messages, &mut text_blocks, &entry.role);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn storage() -> (tempfile::TempDir, RawSession) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        write(
            &root.join("session/ses_1.json"),
            r#"{"id":"ses_1","directory":"/home/ada/tool","version":"0.6.3",
               "time":{"created":1743500000000,"updated":1743500600000}}"#,
        );
        write(
            &root.join("message/ses_1/msg_01.json"),
            r#"{"id":"msg_01","role":"user","time":{"created":1743500000000}}"#,
        );
        write(
            &root.join("part/msg_01/prt_01.json"),
            r#"{"type":"text","text":"rename the struct"}"#,
        );
        write(
            &root.join("message/ses_1/msg_02.json"),
            r#"{"id":"msg_02","role":"assistant","time":{"created":1743500010000},"modelID":"claude-sonnet-4"}"#,
        );
        write(
            &root.join("part/msg_02/prt_01.json"),
            r#"{"type":"reasoning","text":"find usages first"}"#,
        );
        write(
            &root.join("part/msg_02/prt_02.json"),
            r#"{"type":"tool","callID":"call_9","tool":"grep",
               "state":{"status":"completed","input":{"pattern":"OldName"},"output":"3 matches"}}"#,
        );
        write(
            &root.join("part/msg_02/prt_03.json"),
            r#"{"type":"text","text":"renamed everywhere"}"#,
        );
        let raw = RawSession::from_path("ses_1".to_string(), root.join("session/ses_1.json"));
        (dir, raw)
    }

    #[test]
    fn assembles_messages_from_part_tree() {
        let (_dir, raw) = storage();
        let detail = OpencodeNormalizer.parse(&raw).unwrap();

        assert_eq!(detail.session_id, "ses_1");
        assert_eq!(detail.title, "rename the struct");
        assert_eq!(detail.metadata.cwd.as_deref(), Some("/home/ada/tool"));
        assert_eq!(
            detail.metadata.models,
            vec![("claude-sonnet-4".to_string(), 1)]
        );
        // user text, reasoning, tool (with inline result), assistant text
        assert_eq!(detail.messages.len(), 4);
        match &detail.messages[2] {
            ParsedMessage::ToolUse {
                tool_name,
                input,
                results,
                ..
            } => {
                assert_eq!(tool_name, "grep");
                assert_eq!(input["pattern"], "OldName");
                assert_eq!(results[0].output, "3 matches");
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
    fn message_without_parts_leaves_error_info() {
        let (dir, raw) = storage();
        write(
            &dir.path().join("message/ses_1/msg_03.json"),
            r#"{"id":"msg_03","role":"user","time":{"created":1743500020000}}"#,
        );
        let detail = OpencodeNormalizer.parse(&raw).unwrap();
        assert!(matches!(
            detail.messages.last().unwrap(),
            ParsedMessage::Info { .. }
        ));
    }

    #[test]
    fn missing_info_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let raw = RawSession::from_path(
            "ghost".to_string(),
            dir.path().join("session/ghost.json"),
        );
        assert!(OpencodeNormalizer.parse(&raw).is_none());
    }
}

use serde_json::Value;

use loghive_types::{
    ContentBlock, InfoStyle, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata,
    correlate, truncate_title,
};

use super::schema::{SessionState, TimelineEvent};
use crate::coerce::{coerce_content, derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct CopilotNormalizer;

impl SessionNormalizer for CopilotNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let bytes = std::fs::read(&raw.root).ok()?;
        let state: SessionState = serde_json::from_slice(&bytes).ok()?;

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut models = ModelCounter::new();
        let mut last_ts: Option<String> = None;

        for event in &state.timeline {
            let timestamp = event_timestamp(event)
                .or_else(|| state.start_time.clone())
                .or_else(|| raw.fs_modified.clone())
                .unwrap_or_default();
            if !timestamp.is_empty() {
                last_ts = Some(timestamp.clone());
            }

            match event {
                TimelineEvent::UserMessage(message) => {
                    let blocks = coerce_content(&message.content);
                    if blocks.is_empty() {
                        continue;
                    }
                    messages.push(ParsedMessage::User {
                        timestamp,
                        content: blocks,
                    });
                }
                TimelineEvent::AssistantMessage(message) => {
                    if let Some(model) = &message.model {
                        models.record(model);
                    }
                    let blocks = coerce_content(&message.content);
                    if blocks.is_empty() {
                        continue;
                    }
                    messages.push(ParsedMessage::AssistantText {
                        timestamp,
                        content: blocks,
                    });
                }
                TimelineEvent::ToolInvocation(invocation) => {
                    messages.push(ParsedMessage::ToolUse {
                        timestamp,
                        tool_name: invocation.tool_name.clone(),
                        tool_call_id: invocation.tool_call_id.clone(),
                        input: value_to_input_map(&invocation.input),
                        results: Vec::new(),
                    });
                }
                TimelineEvent::ToolResultEvent(result) => {
                    messages.push(ParsedMessage::ToolResult {
                        timestamp,
                        tool_call_id: result.tool_call_id.clone(),
                        output: vec![ContentBlock::code(value_to_text(&result.output))],
                        is_error: result.is_error.unwrap_or(false),
                    });
                }
                TimelineEvent::Info(info) => {
                    let text = value_to_text(&info.content);
                    if text.trim().is_empty() {
                        continue;
                    }
                    messages.push(ParsedMessage::Info {
                        timestamp,
                        title: truncate_title(&text, 80),
                        subtitle: None,
                        content: None,
                        style: InfoStyle::Default,
                    });
                }
                TimelineEvent::Unknown => {}
            }
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        let metadata = SessionMetadata {
            cwd: state.cwd.clone().filter(|c| !c.is_empty()),
            models: models.into_sorted(),
            created_at: state.start_time.clone().or_else(|| raw.fs_created.clone()),
            modified_at: last_ts.or_else(|| raw.fs_modified.clone()),
            message_count: messages.len(),
            ..Default::default()
        };

        let title = derive_title(&messages, "copilot", &state.session_id);
        Some(SessionDetail {
            session_id: state.session_id,
            title,
            messages,
            metadata,
        })
    }
}

fn event_timestamp(event: &TimelineEvent) -> Option<String> {
    match event {
        TimelineEvent::UserMessage(m) | TimelineEvent::AssistantMessage(m) => m.timestamp.clone(),
        TimelineEvent::ToolInvocation(i) => i.timestamp.clone(),
        TimelineEvent::ToolResultEvent(r) => r.timestamp.clone(),
        TimelineEvent::Info(i) => i.timestamp.clone(),
        TimelineEvent::Unknown => None,
    }
}

fn value_to_text(value: &Value) -> String {
    match value {
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
        let session = dir.path().join("a81f-22");
        std::fs::create_dir_all(&session).unwrap();
        let path = session.join("state.json");
        std::fs::write(&path, json).unwrap();
        (dir, RawSession::from_path("a81f-22".to_string(), path))
    }

    #[test]
    fn parses_timeline_and_correlates_tool_result() {
        let (_dir, raw) = raw_from(
            r#"{
              "sessionId": "a81f-22",
              "startTime": "2025-04-01T09:00:00Z",
              "cwd": "/home/sam/api",
              "timeline": [
                {"type": "user.message", "timestamp": "2025-04-01T09:00:00Z",
                 "content": "add request logging"},
                {"type": "tool.invocation", "timestamp": "2025-04-01T09:00:05Z",
                 "toolName": "str_replace_editor", "toolCallId": "tc_1",
                 "input": {"path": "src/middleware.rs"}},
                {"type": "tool.result", "timestamp": "2025-04-01T09:00:06Z",
                 "toolCallId": "tc_1", "output": "edit applied"},
                {"type": "assistant.message", "timestamp": "2025-04-01T09:00:10Z",
                 "content": "logging middleware added", "model": "gpt-5"},
                {"type": "info", "timestamp": "2025-04-01T09:00:11Z",
                 "content": "session compacted"}
              ]
            }"#,
        );

        let detail = CopilotNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.session_id, "a81f-22");
        assert_eq!(detail.title, "add request logging");
        assert_eq!(detail.metadata.cwd.as_deref(), Some("/home/sam/api"));
        assert_eq!(detail.metadata.models, vec![("gpt-5".to_string(), 1)]);
        // user, tool_use (result folded in), assistant, info
        assert_eq!(detail.messages.len(), 4);
        match &detail.messages[1] {
            ParsedMessage::ToolUse { results, .. } => {
                assert_eq!(results[0].output, "edit applied");
            }
            other => panic!("expected tool_use, got {other:?}"),
        }
        assert!(matches!(
            &detail.messages[3],
            ParsedMessage::Info {
                style: InfoStyle::Default,
                ..
            }
        ));
    }

    #[test]
    fn unknown_timeline_events_are_skipped() {
        let (_dir, raw) = raw_from(
            r#"{"sessionId": "s", "timeline": [
                {"type": "telemetry.flush", "timestamp": "2025-04-01T09:00:00Z"},
                {"type": "user.message", "content": "hi"}]}"#,
        );
        let detail = CopilotNormalizer.parse(&raw).unwrap();
        assert_eq!(detail.messages.len(), 1);
    }

    #[test]
    fn empty_timeline_is_none() {
        let (_dir, raw) = raw_from(r#"{"sessionId": "s", "timeline": []}"#);
        assert!(CopilotNormalizer.parse(&raw).is_none());
    }
}

use loghive_types::{
    InfoStyle, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata, ToolResult, correlate,
    truncate_title,
};

use super::schema::{GeminiMessage, GeminiSession, ToolCall};
use crate::coerce::{coerce_content, derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct GeminiNormalizer;

impl SessionNormalizer for GeminiNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let bytes = std::fs::read(&raw.root).ok()?;
        let session: GeminiSession = serde_json::from_slice(&bytes).ok()?;

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut models = ModelCounter::new();

        for entry in &session.messages {
            match entry {
                GeminiMessage::User(user) => {
                    let blocks = coerce_content(&user.content);
                    if blocks.is_empty() {
                        messages.push(ParsedMessage::parse_error(
                            user.timestamp.clone(),
                            "user entry with empty content",
                        ));
                    } else {
                        messages.push(ParsedMessage::User {
                            timestamp: user.timestamp.clone(),
                            content: blocks,
                        });
                    }
                }
                GeminiMessage::Gemini(assistant) => {
                    if let Some(model) = &assistant.model {
                        models.record(model);
                    }
                    for thought in &assistant.thoughts {
                        let thinking = if thought.subject.is_empty() {
                            thought.description.clone()
                        } else {
                            format!("{}\n{}", thought.subject, thought.description)
                        };
                        if !thinking.trim().is_empty() {
                            messages.push(ParsedMessage::AssistantThinking {
                                timestamp: assistant.timestamp.clone(),
                                thinking,
                            });
                        }
                    }
                    let blocks = coerce_content(&assistant.content);
                    if !blocks.is_empty() {
                        messages.push(ParsedMessage::AssistantText {
                            timestamp: assistant.timestamp.clone(),
                            content: blocks,
                        });
                    }
                    for call in &assistant.tool_calls {
                        messages.push(tool_call_message(&assistant.timestamp, call));
                    }
                }
                GeminiMessage::Info(info) => {
                    let text = info
                        .content
                        .as_str()
                        .map(String::from)
                        .unwrap_or_else(|| info.content.to_string());
                    messages.push(ParsedMessage::Info {
                        timestamp: info.timestamp.clone(),
                        title: truncate_title(&text, 80),
                        subtitle: None,
                        content: None,
                        style: InfoStyle::Default,
                    });
                }
                GeminiMessage::Unknown => {}
            }
        }

        if messages.is_empty() {
            return None;
        }

        // Gemini inlines results on the call, but correlate() still runs for
        // uniformity with the stream-shaped providers.
        let messages = correlate(messages);
        let metadata = SessionMetadata {
            cwd: session.workspace_dir.clone().filter(|w| !w.is_empty()),
            models: models.into_sorted(),
            created_at: session.start_time.clone().or_else(|| raw.fs_created.clone()),
            modified_at: session
                .last_updated
                .clone()
                .or_else(|| raw.fs_modified.clone()),
            message_count: messages.len(),
            ..Default::default()
        };

        let title = derive_title(&messages, "gemini", &session.session_id);
        Some(SessionDetail {
            session_id: session.session_id,
            title,
            messages,
            metadata,
        })
    }
}

/// Gemini records a tool call and its completed result in one entry.
fn tool_call_message(timestamp: &str, call: &ToolCall) -> ParsedMessage {
    let mut results = Vec::new();
    if let Some(display) = call.result_display.as_ref().filter(|d| !d.is_empty()) {
        results.push(ToolResult {
            output: display.clone(),
            is_error: call.status.as_deref() == Some("error"),
            tool_call_id: call.id.clone(),
        });
    }
    ParsedMessage::ToolUse {
        timestamp: timestamp.to_string(),
        tool_name: call.name.clone(),
        tool_call_id: call.id.clone(),
        input: value_to_input_map(&call.args),
        results,
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader};

use serde_json::Value;

use loghive_types::{
    ContentBlock, ModelCounter, ParsedMessage, SessionDetail, SessionMetadata, correlate,
};

use super::schema::{ResponseItem, RolloutLine, SessionMeta, TurnContext};
use crate::coerce::{coerce_content, derive_title, value_to_input_map};
use crate::traits::{RawSession, SessionNormalizer};

pub struct CodexNormalizer;

impl SessionNormalizer for CodexNormalizer {
    fn parse(&self, raw: &RawSession) -> Option<SessionDetail> {
        let file = File::open(&raw.root).ok()?;
        let reader = BufReader::new(file);

        let mut messages: Vec<ParsedMessage> = Vec::new();
        let mut metadata = SessionMetadata::default();
        let mut models = ModelCounter::new();
        let mut current_model: Option<String> = None;
        let mut session_id = raw.external_id.clone();
        let mut last_timestamp = raw.fs_modified.clone().unwrap_or_default();

        for line in reader.lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }

            let envelope: RolloutLine = match serde_json::from_str(&line) {
                Ok(envelope) => envelope,
                Err(err) => {
                    messages.push(ParsedMessage::parse_error(
                        last_timestamp.clone(),
                        format!("malformed rollout line: {}", err),
                    ));
                    continue;
                }
            };
            if let Some(ts) = &envelope.timestamp {
                last_timestamp = ts.clone();
            }
            let timestamp = envelope.timestamp.clone().unwrap_or_else(|| last_timestamp.clone());

            match envelope.kind.as_str() {
                "session_meta" => {
                    if let Ok(meta) = serde_json::from_value::<SessionMeta>(envelope.payload) {
                        if let Some(id) = meta.id {
                            session_id = id;
                        }
                        metadata.cwd = meta.cwd.filter(|c| !c.is_empty());
                        metadata.version = meta.cli_version;
                        metadata.git_branch = meta.git.and_then(|g| g.branch);
                        if metadata.created_at.is_none() {
                            metadata.created_at = meta.timestamp;
                        }
                    }
                }
                "turn_context" => {
                    if let Ok(ctx) = serde_json::from_value::<TurnContext>(envelope.payload) {
                        current_model = ctx.model;
                    }
                }
                "response_item" => {
                    if let Some(model) = &current_model {
                        // Only generation items count toward model usage.
                        if is_generation_item(&envelope.payload) {
                            models.record(model);
                        }
                    }
                    push_response_item(&mut messages, timestamp, envelope.payload);
                }
                // Transient event_msg lines (token counts, notifications)
                // carry nothing the conversation view needs.
                _ => {}
            }
        }

        if messages.is_empty() {
            return None;
        }

        let messages = correlate(messages);
        metadata.models = models.into_sorted();
        if metadata.created_at.is_none() {
            metadata.created_at = messages
                .first()
                .map(|m| m.timestamp().to_string())
                .filter(|t| !t.is_empty())
                .or_else(|| raw.fs_created.clone());
        }
        metadata.modified_at = messages
            .last()
            .map(|m| m.timestamp().to_string())
            .filter(|t| !t.is_empty())
            .or_else(|| raw.fs_modified.clone());
        metadata.message_count = messages.len();

        let title = derive_title(&messages, "codex", &session_id);
        Some(SessionDetail {
            session_id,
            title,
            messages,
            metadata,
        })
    }
}

fn is_generation_item(payload: &Value) -> bool {
    matches!(
        payload.get("type").and_then(Value::as_str),
        Some("message") | Some("function_call") | Some("reasoning")
    ) && payload.get("role").and_then(Value::as_str) != Some("user")
}

fn push_response_item(messages: &mut Vec<ParsedMessage>, timestamp: String, payload: Value) {
    let item: ResponseItem = match serde_json::from_value(payload) {
        Ok(item) => item,
        Err(_) => return, // unknown item kinds are ignored, not fatal
    };

    match item {
        ResponseItem::Message { role, content } => {
            let blocks = coerce_content(&content);
            match role.as_str() {
                "user" => {
                    if is_environment_context(&blocks) {
                        return;
                    }
                    if blocks.is_empty() {
                        messages.push(ParsedMessage::parse_error(
                            timestamp,
                            "user message with empty content",
                        ));
                    } else {
                        messages.push(ParsedMessage::User {
                            timestamp,
                            content: blocks,
                        });
                    }
                }
                "assistant" => {
                    if !blocks.is_empty() {
                        messages.push(ParsedMessage::AssistantText {
                            timestamp,
                            content: blocks,
                        });
                    }
                }
                _ => {}
            }
        }
        ResponseItem::Reasoning { summary } => {
            let thinking: Vec<String> = summary
                .into_iter()
                .map(|s| s.text)
                .filter(|t| !t.trim().is_empty())
                .collect();
            if !thinking.is_empty() {
                messages.push(ParsedMessage::AssistantThinking {
                    timestamp,
                    thinking: thinking.join("\n\n"),
                });
            }
        }
        ResponseItem::FunctionCall {
            name,
            arguments,
            call_id,
        } => {
            // Arguments arrive as a JSON string; fall back to a single entry
            // when they do not parse.
            let input = arguments
                .as_deref()
                .and_then(|a| serde_json::from_str::<Value>(a).ok())
                .map(|v| value_to_input_map(&v))
                .unwrap_or_else(|| {
                    let mut map = std::collections::BTreeMap::new();
                    if let Some(a) = arguments.filter(|a| !a.is_empty()) {
                        map.insert("arguments".to_string(), a);
                    }
                    map
                });
            messages.push(ParsedMessage::ToolUse {
                timestamp,
                tool_name: name,
                tool_call_id: call_id,
                input,
                results: Vec::new(),
            });
        }
        ResponseItem::FunctionCallOutput { call_id, output } => {
            let output_blocks = match &output {
                Value::String(s) if !s.is_empty() => vec![ContentBlock::code(s.clone())],
                Value::Object(obj) => match obj.get("content").and_then(Value::as_str) {
                    Some(s) if !s.is_empty() => vec![ContentBlock::code(s.to_string())],
                    _ => coerce_content(&output),
                },
                other => coerce_content(other),
            };
            messages.push(ParsedMessage::ToolResult {
                timestamp,
                tool_call_id: call_id,
                output: output_blocks,
                is_error: output
                    .get("success")
                    .and_then(Value::as_bool)
                    .is_some_and(|ok| !ok),
            });
        }
        ResponseItem::Unknown => {}
    }
}

/// Codex prepends an `<environment_context>` block to the first user turn;
/// it is provider bookkeeping, not something the user typed.
fn is_environment_context(blocks: &[ContentBlock]) -> bool {
    blocks.len() == 1
        && blocks[0]
            .plain_text()
            .trim_start()
            .starts_with("<environment_context>")
}

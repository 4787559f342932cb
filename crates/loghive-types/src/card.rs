use serde::{Deserialize, Serialize};

use crate::content::{ContentBlock, blocks_to_text};
use crate::message::{InfoStyle, ParsedMessage};
use crate::util::truncate_title;

/// Display classification for a persisted message row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardType {
    User,
    Assistant,
    Thinking,
    ToolUse,
    ToolResult,
    Info,
    Error,
}

impl CardType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardType::User => "user",
            CardType::Assistant => "assistant",
            CardType::Thinking => "thinking",
            CardType::ToolUse => "tool-use",
            CardType::ToolResult => "tool-result",
            CardType::Info => "info",
            CardType::Error => "error",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(CardType::User),
            "assistant" => Some(CardType::Assistant),
            "thinking" => Some(CardType::Thinking),
            "tool-use" => Some(CardType::ToolUse),
            "tool-result" => Some(CardType::ToolResult),
            "info" => Some(CardType::Info),
            "error" => Some(CardType::Error),
            _ => None,
        }
    }
}

/// The denormalized per-row form a `ParsedMessage` takes in the primary store.
/// `seq` is the message's position in the session and the key for
/// idempotent re-import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderableMessage {
    pub seq: usize,
    pub card_type: CardType,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
    pub expandable: bool,
    pub timestamp: String,
}

impl RenderableMessage {
    pub fn from_message(seq: usize, message: &ParsedMessage) -> Self {
        let timestamp = message.timestamp().to_string();
        match message {
            ParsedMessage::User { content, .. } => RenderableMessage {
                seq,
                card_type: CardType::User,
                title: None,
                subtitle: None,
                content: content.clone(),
                is_error: false,
                expandable: false,
                timestamp,
            },
            ParsedMessage::AssistantText { content, .. } => RenderableMessage {
                seq,
                card_type: CardType::Assistant,
                title: None,
                subtitle: None,
                content: content.clone(),
                is_error: false,
                expandable: false,
                timestamp,
            },
            ParsedMessage::AssistantThinking { thinking, .. } => RenderableMessage {
                seq,
                card_type: CardType::Thinking,
                title: Some("Thinking".to_string()),
                subtitle: None,
                content: vec![ContentBlock::markdown(thinking.clone())],
                is_error: false,
                expandable: true,
                timestamp,
            },
            ParsedMessage::ToolUse {
                tool_name,
                input,
                results,
                ..
            } => {
                let subtitle = input
                    .values()
                    .next()
                    .map(|v| truncate_title(v, 80))
                    .filter(|s| !s.is_empty());
                let mut content = Vec::new();
                if !input.is_empty() {
                    let value = serde_json::to_value(input).unwrap_or_default();
                    content.push(ContentBlock::json_value(&value));
                }
                for result in results {
                    content.push(ContentBlock::code(result.output.clone()));
                }
                RenderableMessage {
                    seq,
                    card_type: CardType::ToolUse,
                    title: Some(tool_name.clone()),
                    subtitle,
                    content,
                    is_error: results.iter().any(|r| r.is_error),
                    expandable: true,
                    timestamp,
                }
            }
            ParsedMessage::ToolResult {
                output, is_error, ..
            } => RenderableMessage {
                seq,
                card_type: CardType::ToolResult,
                title: Some("Tool result".to_string()),
                subtitle: Some(truncate_title(&blocks_to_text(output), 80))
                    .filter(|s| !s.is_empty()),
                content: output.clone(),
                is_error: *is_error,
                expandable: true,
                timestamp,
            },
            ParsedMessage::Info {
                title,
                subtitle,
                content,
                style,
                ..
            } => RenderableMessage {
                seq,
                card_type: match style {
                    InfoStyle::Default => CardType::Info,
                    InfoStyle::Error => CardType::Error,
                },
                title: Some(title.clone()),
                subtitle: subtitle.clone(),
                content: content.clone().unwrap_or_default(),
                is_error: *style == InfoStyle::Error,
                expandable: content.as_ref().is_some_and(|c| !c.is_empty()),
                timestamp,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ToolResult;
    use std::collections::BTreeMap;

    #[test]
    fn card_type_round_trips_as_str() {
        for card in [
            CardType::User,
            CardType::Assistant,
            CardType::Thinking,
            CardType::ToolUse,
            CardType::ToolResult,
            CardType::Info,
            CardType::Error,
        ] {
            assert_eq!(CardType::parse(card.as_str()), Some(card));
        }
        assert_eq!(CardType::parse("banana"), None);
    }

    #[test]
    fn tool_use_card_carries_error_flag_from_results() {
        let message = ParsedMessage::ToolUse {
            timestamp: "2025-01-01T00:00:00Z".into(),
            tool_name: "Bash".into(),
            tool_call_id: Some("c9".into()),
            input: BTreeMap::new(),
            results: vec![ToolResult {
                output: "command not found".into(),
                is_error: true,
                tool_call_id: Some("c9".into()),
            }],
        };
        let card = RenderableMessage::from_message(3, &message);
        assert_eq!(card.card_type, CardType::ToolUse);
        assert_eq!(card.seq, 3);
        assert!(card.is_error);
        assert!(card.expandable);
    }

    #[test]
    fn error_info_maps_to_error_card() {
        let message = ParsedMessage::parse_error("2025-01-01T00:00:00Z", "oops");
        let card = RenderableMessage::from_message(0, &message);
        assert_eq!(card.card_type, CardType::Error);
        assert!(card.is_error);
    }
}

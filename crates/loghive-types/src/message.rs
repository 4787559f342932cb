use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::content::{ContentBlock, blocks_to_text};

/// Output of a correlated tool invocation, reduced to what the UI needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    pub output: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InfoStyle {
    Default,
    Error,
}

/// One normalized conversation event. Every adapter produces these and
/// nothing downstream of the adapters looks at provider formats again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
#[serde(rename_all = "snake_case")]
pub enum ParsedMessage {
    User {
        timestamp: String,
        content: Vec<ContentBlock>,
    },
    AssistantText {
        timestamp: String,
        content: Vec<ContentBlock>,
    },
    AssistantThinking {
        timestamp: String,
        thinking: String,
    },
    ToolUse {
        timestamp: String,
        tool_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
        #[serde(default)]
        input: BTreeMap<String, String>,
        #[serde(default)]
        results: Vec<ToolResult>,
    },
    ToolResult {
        timestamp: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_call_id: Option<String>,
        output: Vec<ContentBlock>,
        is_error: bool,
    },
    Info {
        timestamp: String,
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subtitle: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        content: Option<Vec<ContentBlock>>,
        style: InfoStyle,
    },
}

impl ParsedMessage {
    pub fn timestamp(&self) -> &str {
        match self {
            ParsedMessage::User { timestamp, .. }
            | ParsedMessage::AssistantText { timestamp, .. }
            | ParsedMessage::AssistantThinking { timestamp, .. }
            | ParsedMessage::ToolUse { timestamp, .. }
            | ParsedMessage::ToolResult { timestamp, .. }
            | ParsedMessage::Info { timestamp, .. } => timestamp,
        }
    }

    /// Convenience constructor for the malformed-input audit trail.
    pub fn parse_error(timestamp: impl Into<String>, detail: impl Into<String>) -> Self {
        ParsedMessage::Info {
            timestamp: timestamp.into(),
            title: "Unparseable entry".to_string(),
            subtitle: None,
            content: Some(vec![ContentBlock::text(detail)]),
            style: InfoStyle::Error,
        }
    }

    /// Text used for search indexing. Empty means the message is not indexed.
    pub fn search_text(&self) -> String {
        match self {
            ParsedMessage::User { content, .. }
            | ParsedMessage::AssistantText { content, .. } => blocks_to_text(content),
            ParsedMessage::AssistantThinking { thinking, .. } => thinking.clone(),
            ParsedMessage::ToolUse {
                tool_name,
                input,
                results,
                ..
            } => {
                let mut text = tool_name.clone();
                for value in input.values() {
                    text.push('\n');
                    text.push_str(value);
                }
                for result in results {
                    text.push('\n');
                    text.push_str(&result.output);
                }
                text
            }
            ParsedMessage::ToolResult { output, .. } => blocks_to_text(output),
            ParsedMessage::Info {
                title,
                subtitle,
                content,
                ..
            } => {
                let mut text = title.clone();
                if let Some(subtitle) = subtitle {
                    text.push('\n');
                    text.push_str(subtitle);
                }
                if let Some(content) = content {
                    let body = blocks_to_text(content);
                    if !body.is_empty() {
                        text.push('\n');
                        text.push_str(&body);
                    }
                }
                text
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_text_covers_tool_use_inputs_and_results() {
        let mut input = BTreeMap::new();
        input.insert("file_path".to_string(), "src/main.rs".to_string());
        let message = ParsedMessage::ToolUse {
            timestamp: "2025-01-01T00:00:00Z".into(),
            tool_name: "Read".into(),
            tool_call_id: Some("c1".into()),
            input,
            results: vec![ToolResult {
                output: "file contents".into(),
                is_error: false,
                tool_call_id: Some("c1".into()),
            }],
        };
        let text = message.search_text();
        assert!(text.contains("Read"));
        assert!(text.contains("src/main.rs"));
        assert!(text.contains("file contents"));
    }

    #[test]
    fn parse_error_is_error_styled() {
        let message = ParsedMessage::parse_error("2025-01-01T00:00:00Z", "bad json");
        match message {
            ParsedMessage::Info { style, .. } => assert_eq!(style, InfoStyle::Error),
            _ => panic!("expected info message"),
        }
    }
}

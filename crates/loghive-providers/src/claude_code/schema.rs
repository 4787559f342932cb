use serde::Deserialize;
use serde_json::Value;

/// One line of a Claude Code session stream. Unknown record types are
/// tolerated, not fatal.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ClaudeRecord {
    User(EnvelopeRecord),
    Assistant(EnvelopeRecord),
    Summary(SummaryRecord),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct EnvelopeRecord {
    #[serde(default)]
    pub session_id: Option<String>,
    pub timestamp: String,
    pub message: RecordMessage,
    #[serde(default)]
    pub is_meta: bool,
    #[serde(default)]
    pub is_sidechain: bool,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub git_branch: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordMessage {
    #[serde(default)]
    pub model: Option<String>,
    /// String or block array; coerced later.
    #[serde(default)]
    pub content: Value,
}

/// Conversation summaries are display sugar; the importer ignores them.
#[derive(Debug, Deserialize)]
pub(crate) struct SummaryRecord {}

/// A single block inside a user/assistant content array.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ClaudeBlock {
    Text {
        text: String,
    },
    Thinking {
        thinking: String,
    },
    ToolUse {
        id: Option<String>,
        name: String,
        #[serde(default)]
        input: Value,
    },
    ToolResult {
        #[serde(default)]
        tool_use_id: Option<String>,
        #[serde(default)]
        content: Value,
        #[serde(default)]
        is_error: bool,
    },
    #[serde(other)]
    Unknown,
}

use serde::Deserialize;
use serde_json::Value;

/// `<task-dir>/task_metadata.json`. Only the fields the importer needs; the
/// file also tracks context-window bookkeeping we ignore.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct TaskMetadata {
    #[serde(default, alias = "cwd_on_task_initialization")]
    pub cwd: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// One element of `<task-dir>/api_conversation_history.json`, an Anthropic
/// API message as Cline sent or received it.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub role: String,
    #[serde(default)]
    pub content: Value,
    /// Epoch milliseconds.
    #[serde(default)]
    pub ts: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ApiBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
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
        is_error: Option<bool>,
    },
    #[serde(other)]
    Unknown,
}

use serde::Deserialize;
use serde_json::Value;

/// One aggregated `session-*.json` document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GeminiSession {
    pub session_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Present in newer CLI versions; a session without it cannot be grouped
    /// into a project and is skipped.
    #[serde(default)]
    pub workspace_dir: Option<String>,
    #[serde(default)]
    pub messages: Vec<GeminiMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "lowercase")]
pub(crate) enum GeminiMessage {
    User(UserMessage),
    Gemini(AssistantMessage),
    Info(InfoEntry),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserMessage {
    pub timestamp: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AssistantMessage {
    pub timestamp: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub thoughts: Vec<Thought>,
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InfoEntry {
    pub timestamp: String,
    #[serde(default)]
    pub content: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Thought {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolCall {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: Value,
    #[serde(default)]
    pub result_display: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

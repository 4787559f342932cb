use serde::Deserialize;
use serde_json::Value;

/// `<session-dir>/state.json`: the whole session as one document with a
/// flat event timeline.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionState {
    pub session_id: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub timeline: Vec<TimelineEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum TimelineEvent {
    #[serde(rename = "user.message")]
    UserMessage(MessageEvent),
    #[serde(rename = "assistant.message")]
    AssistantMessage(MessageEvent),
    #[serde(rename = "tool.invocation")]
    ToolInvocation(ToolInvocationEvent),
    #[serde(rename = "tool.result")]
    ToolResultEvent(ToolResultEvent),
    #[serde(rename = "info")]
    Info(InfoEvent),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content: Value,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolInvocationEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tool_name: String,
    #[serde(default)]
    pub tool_call_id: Option<String>,
    #[serde(default)]
    pub input: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ToolResultEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub tool_call_id: Option<String>,
    #[serde(default)]
    pub output: Value,
    #[serde(default)]
    pub is_error: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InfoEvent {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub content: Value,
}

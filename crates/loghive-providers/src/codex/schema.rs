use serde::Deserialize;
use serde_json::Value;

/// One line of a Codex rollout stream: a timestamped envelope around either
/// session metadata, a response item, or a transient event message.
#[derive(Debug, Deserialize)]
pub(crate) struct RolloutLine {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub payload: Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionMeta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default)]
    pub cli_version: Option<String>,
    #[serde(default)]
    pub git: Option<GitMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitMeta {
    #[serde(default)]
    pub branch: Option<String>,
}

/// The payload of a `response_item` line.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum ResponseItem {
    Message {
        role: String,
        #[serde(default)]
        content: Value,
    },
    Reasoning {
        #[serde(default)]
        summary: Vec<ReasoningSummary>,
    },
    FunctionCall {
        name: String,
        #[serde(default)]
        arguments: Option<String>,
        #[serde(default)]
        call_id: Option<String>,
    },
    FunctionCallOutput {
        #[serde(default)]
        call_id: Option<String>,
        #[serde(default)]
        output: Value,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReasoningSummary {
    #[serde(default)]
    pub text: String,
}

/// The payload of a `turn_context` line; only the model matters here.
#[derive(Debug, Deserialize)]
pub(crate) struct TurnContext {
    #[serde(default)]
    pub model: Option<String>,
}

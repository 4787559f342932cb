use serde::Deserialize;
use serde_json::Value;

/// `<storage>/session/<id>.json`
#[derive(Debug, Deserialize)]
pub(crate) struct SessionInfo {
    pub id: String,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub time: TimePair,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct TimePair {
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub updated: Option<i64>,
}

/// `<storage>/message/<session-id>/<message-id>.json`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MessageInfo {
    pub id: String,
    pub role: String,
    #[serde(default)]
    pub time: TimePair,
    #[serde(default, rename = "modelID")]
    pub model_id: Option<String>,
}

/// `<storage>/part/<message-id>/<part-id>.json`
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum Part {
    Text {
        #[serde(default)]
        text: String,
    },
    Reasoning {
        #[serde(default)]
        text: String,
    },
    Tool {
        #[serde(default, rename = "callID")]
        call_id: Option<String>,
        #[serde(default)]
        tool: String,
        #[serde(default)]
        state: ToolState,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ToolState {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Option<String>,
}

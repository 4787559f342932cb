use serde::Deserialize;
use serde_json::Value;

/// One thread file under `~/.local/share/amp/threads/`, e.g. `T-abc123.json`.
/// The whole conversation lives in a single aggregated document.
#[derive(Debug, Deserialize)]
pub(crate) struct Thread {
    #[serde(default)]
    pub id: Option<String>,
    /// Epoch milliseconds.
    #[serde(default)]
    pub created: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub env: ThreadEnv,
    #[serde(default)]
    pub messages: Vec<ThreadMessage>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ThreadEnv {
    #[serde(default, rename = "initialDirectory")]
    pub initial_directory: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ThreadMessage {
    pub role: String,
    #[serde(default)]
    pub content: Vec<AmpBlock>,
    #[serde(default)]
    pub meta: MessageMeta,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MessageMeta {
    #[serde(default, rename = "sentAt")]
    pub sent_at: Option<i64>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub(crate) enum AmpBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    Thinking {
        #[serde(default)]
        thinking: String,
    },
    /// Tool invocations carry their result inline under `run` once the tool
    /// has finished.
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: String,
        #[serde(default)]
        input: Value,
        #[serde(default)]
        run: Option<ToolRun>,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ToolRun {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub output: Option<Value>,
}

use serde::{Deserialize, Serialize};

/// One renderable unit of message content. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
#[serde(rename_all = "snake_case")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    Code {
        code: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<String>,
    },
    Markdown {
        markdown: String,
    },
    /// Raw serialized JSON, kept as text so unknown payloads survive verbatim.
    Json {
        json: String,
    },
    Diff {
        old: String,
        new: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    Html {
        html: String,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn code(code: impl Into<String>) -> Self {
        ContentBlock::Code {
            code: code.into(),
            language: None,
        }
    }

    pub fn markdown(markdown: impl Into<String>) -> Self {
        ContentBlock::Markdown {
            markdown: markdown.into(),
        }
    }

    pub fn json_value(value: &serde_json::Value) -> Self {
        ContentBlock::Json {
            json: serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
        }
    }

    /// Plain text carried by this block, used for titles and search bodies.
    pub fn plain_text(&self) -> &str {
        match self {
            ContentBlock::Text { text } => text,
            ContentBlock::Code { code, .. } => code,
            ContentBlock::Markdown { markdown } => markdown,
            ContentBlock::Json { json } => json,
            ContentBlock::Html { html } => html,
            ContentBlock::Diff { .. } => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ContentBlock::Diff { old, new, .. } => old.is_empty() && new.is_empty(),
            other => other.plain_text().trim().is_empty(),
        }
    }
}

/// Join the plain text of a block list, skipping blocks with no text.
pub fn blocks_to_text(blocks: &[ContentBlock]) -> String {
    let mut out = String::new();
    for block in blocks {
        let text = match block {
            ContentBlock::Diff { old, new, path } => {
                let mut t = String::new();
                if let Some(p) = path {
                    t.push_str(p);
                    t.push('\n');
                }
                t.push_str(old);
                t.push('\n');
                t.push_str(new);
                t
            }
            other => other.plain_text().to_string(),
        };
        if text.trim().is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&text);
    }
    out
}

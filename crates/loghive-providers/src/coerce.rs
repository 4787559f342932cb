use std::collections::BTreeMap;

use serde_json::Value;

use loghive_types::{ContentBlock, ParsedMessage, truncate_title};

pub const TITLE_MAX_CHARS: usize = 100;

/// Coerce an arbitrary provider payload into content blocks.
///
/// Strings become a single text block, arrays map block-by-block on their
/// declared sub-type, and anything else object-shaped is kept whole as a
/// JSON block so no input disappears silently. An entirely empty payload
/// returns an empty vec; callers turn that into an error-styled info message
/// when dropping it would lose information.
pub fn coerce_content(value: &Value) -> Vec<ContentBlock> {
    match value {
        Value::String(s) => {
            if s.trim().is_empty() {
                Vec::new()
            } else {
                vec![ContentBlock::text(s.clone())]
            }
        }
        Value::Array(items) => {
            let mut blocks = Vec::new();
            for item in items {
                if let Some(block) = coerce_block(item) {
                    blocks.push(block);
                }
            }
            blocks
        }
        Value::Null => Vec::new(),
        other => vec![ContentBlock::json_value(other)],
    }
}

fn coerce_block(item: &Value) -> Option<ContentBlock> {
    let Some(obj) = item.as_object() else {
        // Bare scalars inside arrays: keep their text.
        let text = item.as_str().map(String::from).unwrap_or_else(|| item.to_string());
        return if text.trim().is_empty() {
            None
        } else {
            Some(ContentBlock::text(text))
        };
    };

    let kind = obj.get("type").and_then(Value::as_str).unwrap_or("");
    match kind {
        "text" | "input_text" | "output_text" => {
            let text = obj.get("text").and_then(Value::as_str)?;
            if text.trim().is_empty() {
                None
            } else {
                Some(ContentBlock::text(text.to_string()))
            }
        }
        "markdown" => {
            let markdown = obj.get("markdown").or_else(|| obj.get("text"))?.as_str()?;
            Some(ContentBlock::markdown(markdown.to_string()))
        }
        "code" => {
            let code = obj.get("code").or_else(|| obj.get("text"))?.as_str()?;
            Some(ContentBlock::Code {
                code: code.to_string(),
                language: obj.get("language").and_then(Value::as_str).map(String::from),
            })
        }
        "diff" => Some(ContentBlock::Diff {
            old: obj
                .get("old")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            new: obj
                .get("new")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            path: obj.get("path").and_then(Value::as_str).map(String::from),
        }),
        "html" => {
            let html = obj.get("html").or_else(|| obj.get("text"))?.as_str()?;
            Some(ContentBlock::Html {
                html: html.to_string(),
            })
        }
        // Unknown sub-kinds are kept verbatim, not dropped.
        _ => Some(ContentBlock::json_value(item)),
    }
}

/// Flatten a tool-call input object into string key/value pairs. Non-string
/// values keep their compact JSON form.
pub fn value_to_input_map(value: &Value) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    if let Some(obj) = value.as_object() {
        for (key, val) in obj {
            let rendered = match val {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            map.insert(key.clone(), rendered);
        }
    } else if !value.is_null() {
        map.insert("input".to_string(), value.to_string());
    }
    map
}

/// The first genuine user message's text, truncated. `None` when the
/// session never carried user text.
pub fn first_user_title(messages: &[ParsedMessage]) -> Option<String> {
    for message in messages {
        if let ParsedMessage::User { content, .. } = message {
            let text = loghive_types::blocks_to_text(content);
            let text = text.trim();
            if !text.is_empty() {
                return Some(truncate_title(text, TITLE_MAX_CHARS));
            }
        }
    }
    None
}

/// Title for a session: the first genuine user message's text, truncated;
/// otherwise a provider-prefixed placeholder with a short id suffix.
pub fn derive_title(messages: &[ParsedMessage], provider: &str, session_id: &str) -> String {
    first_user_title(messages).unwrap_or_else(|| placeholder_title(provider, session_id))
}

pub fn placeholder_title(provider: &str, session_id: &str) -> String {
    let short: String = session_id.chars().take(8).collect();
    format!("{} session {}", provider, short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_payload_becomes_single_text_block() {
        let blocks = coerce_content(&json!("hello"));
        assert_eq!(blocks, vec![ContentBlock::text("hello")]);
    }

    #[test]
    fn empty_string_payload_is_empty() {
        assert!(coerce_content(&json!("  ")).is_empty());
        assert!(coerce_content(&Value::Null).is_empty());
    }

    #[test]
    fn array_payload_maps_declared_subtypes() {
        let blocks = coerce_content(&json!([
            {"type": "text", "text": "a"},
            {"type": "code", "code": "b", "language": "rust"},
            {"type": "diff", "old": "x", "new": "y", "path": "src/lib.rs"},
        ]));
        assert_eq!(blocks.len(), 3);
        assert!(matches!(blocks[1], ContentBlock::Code { .. }));
        assert!(matches!(blocks[2], ContentBlock::Diff { .. }));
    }

    #[test]
    fn unknown_object_payload_serializes_whole() {
        let blocks = coerce_content(&json!({"weird": true}));
        assert_eq!(blocks.len(), 1);
        match &blocks[0] {
            ContentBlock::Json { json } => assert!(json.contains("weird")),
            other => panic!("expected json block, got {other:?}"),
        }
    }

    #[test]
    fn unknown_array_subtype_is_kept_as_json() {
        let blocks = coerce_content(&json!([{"type": "hologram", "data": 1}]));
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], ContentBlock::Json { .. }));
    }

    #[test]
    fn input_map_stringifies_non_string_values() {
        let map = value_to_input_map(&json!({"path": "a.rs", "limit": 10}));
        assert_eq!(map["path"], "a.rs");
        assert_eq!(map["limit"], "10");
    }

    #[test]
    fn title_falls_back_to_placeholder() {
        let title = derive_title(&[], "codex", "0195b2f4-aaaa-bbbb");
        assert_eq!(title, "codex session 0195b2f4");
    }

    #[test]
    fn title_truncates_first_user_message() {
        let messages = vec![ParsedMessage::User {
            timestamp: "2025-01-01T00:00:00Z".into(),
            content: vec![ContentBlock::text("z".repeat(200))],
        }];
        let title = derive_title(&messages, "claude_code", "s1");
        assert_eq!(title.chars().count(), 101);
        assert!(title.ends_with('…'));
    }
}

use serde::{Deserialize, Serialize};

use crate::message::ParsedMessage;

/// Source-reported session metadata. Timestamps may differ from file times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_branch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cwd: Option<String>,
    /// (model name, usage count), sorted descending by count, ties broken by
    /// first-seen order.
    #[serde(default)]
    pub models: Vec<(String, u64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<String>,
    #[serde(default)]
    pub message_count: usize,
}

/// Counts model identifiers as messages declare them. Insertion order is the
/// tie-break when counts are equal.
#[derive(Debug, Default)]
pub struct ModelCounter {
    entries: Vec<(String, u64)>,
}

impl ModelCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, model: &str) {
        if model.is_empty() {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|(name, _)| name == model) {
            entry.1 += 1;
        } else {
            self.entries.push((model.to_string(), 1));
        }
    }

    pub fn into_sorted(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        // Stable sort keeps first-seen order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// A normalizer's output unit: everything known about one parsed session.
/// Produced fresh on every parse, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetail {
    /// Provider-local session identifier.
    pub session_id: String,
    pub title: String,
    pub messages: Vec<ParsedMessage>,
    pub metadata: SessionMetadata,
}

/// A session bound to its resolved project: the unit the import coordinator
/// batches and persists. The push path constructs these directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionWithProject {
    pub provider: String,
    pub project_path: String,
    pub project_name: String,
    pub created_at: String,
    pub updated_at: String,
    pub detail: SessionDetail,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_counter_sorts_descending_with_first_seen_tie_break() {
        let mut counter = ModelCounter::new();
        counter.record("haiku");
        counter.record("sonnet");
        counter.record("sonnet");
        counter.record("opus");
        let sorted = counter.into_sorted();
        assert_eq!(
            sorted,
            vec![
                ("sonnet".to_string(), 2),
                ("haiku".to_string(), 1),
                ("opus".to_string(), 1),
            ]
        );
    }

    #[test]
    fn model_counter_ignores_empty_names() {
        let mut counter = ModelCounter::new();
        counter.record("");
        assert!(counter.into_sorted().is_empty());
    }
}

use std::collections::{HashMap, HashSet};

use crate::content::ContentBlock;
use crate::message::{ParsedMessage, ToolResult};

/// Link asynchronous tool results to the `ToolUse` messages that produced
/// them. Providers emit tool calls and their results at non-adjacent,
/// sometimes reversed, stream positions, so this runs over the whole session.
///
/// A consumed `ToolResult` message is dropped from the stream; one whose
/// identifier never appears on a `ToolUse` is kept standalone. A `ToolUse`
/// without an identifier is never correlated. Pure and order-preserving.
pub fn correlate(messages: Vec<ParsedMessage>) -> Vec<ParsedMessage> {
    let mut results_by_id: HashMap<String, Vec<ToolResult>> = HashMap::new();
    for message in &messages {
        if let ParsedMessage::ToolResult {
            tool_call_id: Some(id),
            output,
            is_error,
            ..
        } = message
        {
            results_by_id.entry(id.clone()).or_default().push(ToolResult {
                output: reduce_output(output),
                is_error: *is_error,
                tool_call_id: Some(id.clone()),
            });
        }
    }

    let mut consumed: HashSet<String> = HashSet::new();
    for message in &messages {
        if let ParsedMessage::ToolUse {
            tool_call_id: Some(id),
            ..
        } = message
            && results_by_id.contains_key(id)
        {
            consumed.insert(id.clone());
        }
    }

    let mut out = Vec::with_capacity(messages.len());
    for message in messages {
        match message {
            ParsedMessage::ToolUse {
                timestamp,
                tool_name,
                tool_call_id,
                input,
                results,
            } => {
                let results = match tool_call_id.as_deref() {
                    Some(id) => results_by_id.get(id).cloned().unwrap_or(results),
                    None => results,
                };
                out.push(ParsedMessage::ToolUse {
                    timestamp,
                    tool_name,
                    tool_call_id,
                    input,
                    results,
                });
            }
            ParsedMessage::ToolResult {
                ref tool_call_id, ..
            } if tool_call_id
                .as_deref()
                .is_some_and(|id| consumed.contains(id)) =>
            {
                // Inlined into its ToolUse above.
            }
            other => out.push(other),
        }
    }
    out
}

/// First code block's text wins; otherwise serialize the whole block list.
fn reduce_output(output: &[ContentBlock]) -> String {
    for block in output {
        if let ContentBlock::Code { code, .. } = block {
            return code.clone();
        }
    }
    serde_json::to_string(output).unwrap_or_default()
}

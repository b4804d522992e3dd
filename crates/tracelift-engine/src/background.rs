use crate::events::SpanBody;
use crate::ids::deterministic_id;
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Value, json};
use std::collections::HashMap;
use tracelift_types::ActivityKind;

// The shell tool announces a detached command with this marker in its
// result text. The id charset is restricted so trailing punctuation is
// never captured.
static BACKGROUND_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Command running in background with ID:\s*([a-zA-Z0-9]+)")
        .expect("background marker pattern must compile")
});

/// A background task observed starting mid-stream, awaiting retrieval
#[derive(Debug, Clone, PartialEq)]
pub struct PendingBackgroundTask {
    pub origin_tool_use_id: String,
    pub generation_id: String,
    pub activity_kind: ActivityKind,
    pub tool_name: String,
    pub start_time: DateTime<Utc>,
    pub command: Option<String>,
}

/// Tracks in-flight background tasks and matches them to the later
/// blocking retrieval of their output.
#[derive(Debug, Default)]
pub struct BackgroundCorrelator {
    pending: HashMap<String, PendingBackgroundTask>,
}

impl BackgroundCorrelator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a tool result payload for the background-start marker and
    /// return the task id it carries. Result content arrives as a plain
    /// string, a list of blocks, or a single text block.
    pub fn extract_task_id(output: &Value) -> Option<String> {
        let text = flatten_output_text(output);
        BACKGROUND_START
            .captures(&text)
            .map(|captures| captures[1].to_string())
    }

    pub fn register_start(&mut self, task_id: String, task: PendingBackgroundTask) {
        self.pending.insert(task_id, task);
    }

    /// Remove and return the pending entry for `task_id`, if any
    pub fn complete(&mut self, task_id: &str) -> Option<PendingBackgroundTask> {
        self.pending.remove(task_id)
    }

    /// Task ids whose completion was never observed, in stable order.
    /// These are a diagnostic, never an error.
    pub fn drain_pending(self) -> Vec<String> {
        let mut ids: Vec<String> = self.pending.into_keys().collect();
        ids.sort();
        ids
    }
}

/// Task id and blocking flag from a TaskOutput tool call.
///
/// `block` defaults to true; an explicit `block: false` is a poll, not a
/// completion, and must leave the task pending.
pub fn task_output_request(tool_name: &str, tool_input: &Value) -> Option<(String, bool)> {
    if tool_name != "TaskOutput" {
        return None;
    }
    let task_id = tool_input.get("task_id")?.as_str()?.to_string();
    let blocking = tool_input
        .get("block")
        .and_then(Value::as_bool)
        .unwrap_or(true);
    Some((task_id, blocking))
}

/// Umbrella span covering the whole wall-clock interval of a completed
/// background task, parented under the generation that started it.
pub fn umbrella_span_body(
    task_id: &str,
    task: &PendingBackgroundTask,
    completion_time: DateTime<Utc>,
    trace_id: &str,
) -> SpanBody {
    // Seeded from the origin tool_use_id plus the task id so repeated
    // runs upsert the same record
    let span_id = deterministic_id(&format!(
        "umbrella_{}_{}",
        task.origin_tool_use_id, task_id
    ));

    SpanBody {
        id: span_id,
        trace_id: trace_id.to_string(),
        parent_observation_id: task.generation_id.clone(),
        name: format!("BACKGROUND/{}/{}", task.activity_kind, task.tool_name),
        input: json!({ "background_task_id": task_id }),
        output: None,
        start_time: task.start_time,
        end_time: completion_time,
        metadata: json!({
            "activity_kind": task.activity_kind,
            "background_task_id": task_id,
            "origin_tool_use_id": task.origin_tool_use_id,
            "command": task.command,
            "is_background": true,
        }),
    }
}

fn flatten_output_text(output: &Value) -> String {
    match output {
        Value::String(text) => text.clone(),
        Value::Array(blocks) => {
            let parts: Vec<&str> = blocks
                .iter()
                .filter_map(|block| match block {
                    Value::String(text) => Some(text.as_str()),
                    Value::Object(_) => text_block(block),
                    _ => None,
                })
                .collect();
            parts.join("\n")
        }
        Value::Object(_) => text_block(output).unwrap_or_default().to_string(),
        _ => String::new(),
    }
}

fn text_block(block: &Value) -> Option<&str> {
    if block.get("type").and_then(Value::as_str) == Some("text") {
        block.get("text").and_then(Value::as_str)
    } else {
        None
    }
}

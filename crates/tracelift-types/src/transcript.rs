use crate::activity::{ActivityCounts, ActivityKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Session-level metadata. Each field is set once, first non-null value
/// wins, and is never overwritten afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionMetadata {
    pub cwd: Option<String>,
    pub git_branch: Option<String>,
    pub model: Option<String>,
}

impl SessionMetadata {
    pub fn set_workspace_once(&mut self, cwd: Option<String>, git_branch: Option<String>) {
        if self.cwd.is_none() {
            self.cwd = cwd;
        }
        if self.git_branch.is_none() {
            self.git_branch = git_branch;
        }
    }

    pub fn set_model_once(&mut self, model: &str) {
        if self.model.is_none() {
            self.model = Some(model.to_string());
        }
    }
}

/// One tool invocation made by the assistant.
///
/// `tool_use_id` is assigned upstream by the provider API and is stable
/// across replays of the same transcript; tools that do not report one
/// cannot be correlated with their result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCall {
    pub tool_name: String,
    pub tool_input: Value,
    pub tool_use_id: Option<String>,
    pub activity_kind: ActivityKind,
}

/// Token usage counters, also used for session-wide running totals
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_input_tokens: u64,
    pub cache_creation_input_tokens: u64,
}

impl UsageTotals {
    pub fn add(&mut self, other: &UsageTotals) {
        self.input_tokens += other.input_tokens;
        self.output_tokens += other.output_tokens;
        self.cache_read_input_tokens += other.cache_read_input_tokens;
        self.cache_creation_input_tokens += other.cache_creation_input_tokens;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantResponse {
    pub model: Option<String>,
    pub text: Option<String>,
    pub usage: UsageTotals,
    pub tool_calls: Vec<ToolCall>,
    pub timestamp: Option<String>,
}

/// One assistant response paired with the user content that most recently
/// preceded it. A continuation after a tool result has no fresh user text,
/// so `user_message` is None there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub user_message: Option<String>,
    pub user_timestamp: Option<String>,
    pub assistant: AssistantResponse,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TranscriptTotals {
    pub usage: UsageTotals,
    pub activity_counts: ActivityCounts,
}

/// Result of a full transcript parse: ordered turns, the tool-output side
/// table keyed by tool_use_id, and aggregate counters.
///
/// `Default` is the canonical empty result returned for missing files.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParsedTranscript {
    pub session_metadata: SessionMetadata,
    pub turns: Vec<Turn>,
    pub tool_results: HashMap<String, Value>,
    pub totals: TranscriptTotals,
}

impl ParsedTranscript {
    pub fn total_tool_calls(&self) -> usize {
        self.turns
            .iter()
            .map(|turn| turn.assistant.tool_calls.len())
            .sum()
    }
}

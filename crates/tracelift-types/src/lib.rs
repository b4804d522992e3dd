pub mod activity;
pub mod context;
pub mod transcript;

pub use activity::{ActivityCounts, ActivityKind};
pub use context::OrchestrationContext;
pub use transcript::{
    AssistantResponse, ParsedTranscript, SessionMetadata, ToolCall, TranscriptTotals, Turn,
    UsageTotals,
};

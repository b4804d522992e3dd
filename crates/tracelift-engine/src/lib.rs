// Engine module - turns a parsed transcript into an ordered ingestion batch.
// This layer sits between parsed transcripts (parser) and the sink (CLI).

pub mod assembler;
pub mod background;
pub mod events;
pub mod ids;
pub mod timeline;

pub use assembler::{AssembledBatch, assemble};
pub use background::{BackgroundCorrelator, PendingBackgroundTask, task_output_request};
pub use events::{GenerationBody, IngestionEvent, SpanBody, TraceBody, UsageDetails};
pub use ids::deterministic_id;
pub use timeline::{TurnTimeline, parse_timestamp};

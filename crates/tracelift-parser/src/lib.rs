// Transcript line schema
pub(crate) mod schema;

// Activity classification
pub mod classifier;

// Single-pass transcript parsing
pub mod transcript;

pub use classifier::classify_activity;
pub use transcript::parse_transcript;

// NOTE: tracelift design rationale
//
// Why parse-then-batch (not streaming ingestion)?
// - The hook fires once, after the session stops; the transcript is complete
// - One batch per session keeps upsert semantics trivial (deterministic ids)
// - Trade-off: no live view of a running session, which the hook never needs
//
// Why never-fail entry points?
// - The hook runs inside the agent's Stop path; a telemetry bug must not
//   block or fail the host process
// - Every failure short of a sink rejection logs a diagnostic and exits 0

pub mod account;
pub mod args;
pub mod config;
pub mod debug_log;
pub mod error;
pub mod hook;
pub mod sink;

pub use args::Cli;
pub use error::{Error, Result};
pub use hook::run;

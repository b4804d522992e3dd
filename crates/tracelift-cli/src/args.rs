use clap::Parser;

/// Reconstruct a Claude Code session transcript into a trace batch and
/// ship it to a Langfuse-compatible ingestion endpoint.
///
/// Normally invoked as a Stop hook with `{session_id, transcript_path}`
/// on stdin; the flags below exist for manual runs and debugging.
#[derive(Debug, Parser)]
#[command(name = "tracelift", version, about)]
pub struct Cli {
    /// Transcript path; when omitted, hook input is read from stdin
    #[arg(long)]
    pub transcript: Option<String>,

    /// Session id to pair with --transcript (defaults to the file stem)
    #[arg(long)]
    pub session_id: Option<String>,

    /// Parse and print the assembled batch as JSON without sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Exit non-zero when the batch cannot be delivered to the sink
    /// (hook mode always exits 0)
    #[arg(long)]
    pub strict: bool,
}

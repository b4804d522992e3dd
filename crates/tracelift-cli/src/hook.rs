use crate::account;
use crate::args::Cli;
use crate::config::{self, Config};
use crate::debug_log::DebugLog;
use crate::error::Result;
use crate::sink::{HttpSink, IngestionSink};
use owo_colors::OwoColorize;
use serde::Deserialize;
use std::path::Path;
use tracelift_engine::assemble;
use tracelift_parser::parse_transcript;

/// Stop-hook payload delivered on stdin by the agent
#[derive(Debug, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub transcript_path: Option<String>,
}

/// Top-level entry point. Telemetry must never block or fail the host
/// process, so every path short of an argument error resolves to Ok:
/// bad hook input, a missing transcript, absent credentials, and even a
/// sink rejection all log a diagnostic and return success. `--strict`
/// is the one exception and propagates delivery failures to the caller.
pub fn run(cli: Cli) -> Result<()> {
    let debug = DebugLog::new();
    debug.log("hook started");

    let config = Config::from_env();
    if !config.enabled && !cli.dry_run {
        debug.log("tracing not enabled, exiting");
        return Ok(());
    }

    let Some((session_id, transcript_path)) = resolve_input(&cli, &debug) else {
        return Ok(());
    };
    debug.log(&format!(
        "session_id={}, transcript_path={}",
        session_id, transcript_path
    ));

    let parsed = parse_transcript(&transcript_path);
    debug.log(&format!("parsed {} turns", parsed.turns.len()));

    if config.debug
        && let Ok(pretty) = serde_json::to_string_pretty(&parsed)
    {
        eprintln!("Parsed transcript: {}", pretty);
    }

    eprintln!(
        "{} {} turns, {} tool calls, {} input tokens, {} output tokens",
        "tracelift:".bold(),
        parsed.turns.len(),
        parsed.total_tool_calls(),
        parsed.totals.usage.input_tokens,
        parsed.totals.usage.output_tokens,
    );

    let context = config::orchestration_context_from_env();
    let account_id = account::account_id();
    let batch = assemble(&session_id, &parsed, &context, account_id.as_deref());
    if !batch.pending_background.is_empty() {
        debug.log(&format!(
            "warning: {} background tasks never completed: {:?}",
            batch.pending_background.len(),
            batch.pending_background
        ));
    }

    if cli.dry_run {
        match serde_json::to_string_pretty(&batch.events) {
            Ok(json) => println!("{}", json),
            Err(e) => debug.log(&format!("error serializing batch: {}", e)),
        }
        return Ok(());
    }

    match HttpSink::from_config(&config) {
        Some(sink) => match sink.send_batch(&batch.events) {
            Ok(()) => debug.log(&format!("sent {} events", batch.events.len())),
            Err(e) => {
                debug.log(&format!("error sending batch: {}", e));
                if cli.strict {
                    return Err(e);
                }
                // Telemetry is incomplete but the host must not fail
                eprintln!("{} failed to send batch: {}", "Warning:".yellow(), e);
            }
        },
        None => {
            debug.log("credentials not configured, skipping send");
            eprintln!(
                "{} LANGFUSE_PUBLIC_KEY or LANGFUSE_SECRET_KEY not set",
                "Warning:".yellow()
            );
        }
    }

    Ok(())
}

/// Session id and transcript path, from flags or stdin hook input.
/// None means "nothing to do": the reason has already been logged.
fn resolve_input(cli: &Cli, debug: &DebugLog) -> Option<(String, String)> {
    if let Some(path) = &cli.transcript {
        let session_id = cli
            .session_id
            .clone()
            .or_else(|| file_stem(path))
            .unwrap_or_else(|| "unknown".to_string());
        return Some((session_id, path.clone()));
    }

    let input: HookInput = match serde_json::from_reader(std::io::stdin().lock()) {
        Ok(input) => input,
        Err(e) => {
            debug.log(&format!("error parsing hook input: {}", e));
            eprintln!("{} could not parse hook input: {}", "Warning:".yellow(), e);
            return None;
        }
    };

    let Some(path) = input.transcript_path.filter(|path| !path.is_empty()) else {
        debug.log("no transcript_path in hook input");
        eprintln!("{} no transcript_path in hook input", "Warning:".yellow());
        return None;
    };

    let session_id = input
        .session_id
        .unwrap_or_else(|| "unknown".to_string());
    Some((session_id, path))
}

fn file_stem(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

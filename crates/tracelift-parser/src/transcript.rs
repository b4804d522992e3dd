use crate::classifier::classify_activity;
use crate::schema::{AssistantContent, LogEntry, UserContent};
use serde_json::Value;
use std::path::PathBuf;
use tracelift_types::{AssistantResponse, ParsedTranscript, ToolCall, Turn, UsageTotals};

/// Parse a Claude Code transcript JSONL file into its turn structure.
///
/// Single forward pass in log order. A missing or unreadable file yields
/// the empty result, and malformed lines are skipped; parsing itself
/// never fails.
pub fn parse_transcript(path: &str) -> ParsedTranscript {
    let mut result = ParsedTranscript::default();

    let path = expand_tilde(path);
    let Ok(text) = std::fs::read_to_string(&path) else {
        return result;
    };

    // User content carried forward to the next assistant entry
    let mut pending_user_message: Option<String> = None;
    let mut pending_user_timestamp: Option<String> = None;

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Ok(entry) = serde_json::from_str::<LogEntry>(line) else {
            continue;
        };

        match entry {
            LogEntry::Summary(summary) => {
                result
                    .session_metadata
                    .set_workspace_once(summary.cwd, summary.git_branch);
            }

            LogEntry::User(user) => {
                pending_user_timestamp = user.timestamp;

                let mut text_parts: Vec<String> = Vec::new();
                for block in user.message.content {
                    match block {
                        UserContent::Text { text } => text_parts.push(text),
                        UserContent::ToolResult {
                            tool_use_id,
                            content,
                        } => {
                            // Last write wins on duplicate ids
                            if let Some(id) = tool_use_id {
                                result
                                    .tool_results
                                    .insert(id, content.unwrap_or(Value::Null));
                            }
                        }
                        UserContent::Unknown => {}
                    }
                }

                let assembled = text_parts.join("\n");
                pending_user_message = (!assembled.is_empty()).then_some(assembled);
            }

            LogEntry::Assistant(asst) => {
                let message = asst.message;

                if let Some(model) = &message.model {
                    result.session_metadata.set_model_once(model);
                }

                let mut text_parts: Vec<String> = Vec::new();
                let mut tool_calls: Vec<ToolCall> = Vec::new();
                for block in message.content {
                    match block {
                        AssistantContent::Text { text } => text_parts.push(text),
                        AssistantContent::ToolUse { id, name, input } => {
                            let activity_kind = classify_activity(&name, &input);
                            result.totals.activity_counts.record(activity_kind);
                            tool_calls.push(ToolCall {
                                tool_name: name,
                                tool_input: input,
                                tool_use_id: id,
                                activity_kind,
                            });
                        }
                        AssistantContent::Thinking | AssistantContent::Unknown => {}
                    }
                }

                let usage = UsageTotals {
                    input_tokens: message.usage.input_tokens,
                    output_tokens: message.usage.output_tokens,
                    cache_read_input_tokens: message.usage.cache_read_input_tokens,
                    cache_creation_input_tokens: message.usage.cache_creation_input_tokens,
                };
                result.totals.usage.add(&usage);

                let text = (!text_parts.is_empty()).then(|| text_parts.join("\n"));
                result.turns.push(Turn {
                    user_message: pending_user_message.take(),
                    user_timestamp: pending_user_timestamp.take(),
                    assistant: AssistantResponse {
                        model: message.model,
                        text,
                        usage,
                        tool_calls,
                        timestamp: asst.timestamp,
                    },
                });
            }

            LogEntry::Unknown => {}
        }
    }

    result
}

/// Expand a leading tilde to the user's home directory
fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use tracelift_types::ActivityKind;

    fn write_transcript(lines: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp transcript");
        for line in lines {
            writeln!(file, "{}", line).expect("write transcript line");
        }
        file
    }

    fn parse_lines(lines: &[&str]) -> ParsedTranscript {
        let file = write_transcript(lines);
        parse_transcript(file.path().to_str().expect("utf-8 temp path"))
    }

    const USER_FIX_BUG: &str = r#"{"type":"user","timestamp":"2024-05-01T10:00:00Z","message":{"role":"user","content":"fix bug"}}"#;
    const ASSISTANT_EDIT: &str = r#"{"type":"assistant","timestamp":"2024-05-01T10:00:05Z","message":{"model":"claude-sonnet-4","content":[{"type":"text","text":"done"},{"type":"tool_use","id":"toolu_1","name":"Edit","input":{"file_path":"src/main.rs"}}],"usage":{"input_tokens":100,"output_tokens":20,"cache_read_input_tokens":5,"cache_creation_input_tokens":2}}}"#;

    #[test]
    fn test_missing_file_yields_empty_result() {
        let parsed = parse_transcript("/nonexistent/path/transcript.jsonl");
        assert_eq!(parsed, ParsedTranscript::default());
    }

    #[test]
    fn test_single_turn_with_tool_call() {
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT]);

        assert_eq!(parsed.turns.len(), 1);
        let turn = &parsed.turns[0];
        assert_eq!(turn.user_message.as_deref(), Some("fix bug"));
        assert_eq!(
            turn.user_timestamp.as_deref(),
            Some("2024-05-01T10:00:00Z")
        );
        assert_eq!(turn.assistant.text.as_deref(), Some("done"));
        assert_eq!(
            turn.assistant.timestamp.as_deref(),
            Some("2024-05-01T10:00:05Z")
        );
        assert_eq!(turn.assistant.tool_calls.len(), 1);
        assert_eq!(turn.assistant.tool_calls[0].tool_name, "Edit");
        assert_eq!(
            turn.assistant.tool_calls[0].activity_kind,
            ActivityKind::Code
        );

        assert_eq!(parsed.totals.activity_counts.get(ActivityKind::Code), 1);
        assert_eq!(parsed.totals.activity_counts.total(), 1);
        assert_eq!(parsed.totals.usage.input_tokens, 100);
        assert_eq!(parsed.totals.usage.output_tokens, 20);
        assert_eq!(parsed.session_metadata.model.as_deref(), Some("claude-sonnet-4"));
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let clean = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT]);
        let with_garbage = parse_lines(&[USER_FIX_BUG, "{not json at all", ASSISTANT_EDIT]);
        assert_eq!(clean.turns, with_garbage.turns);
        assert_eq!(clean.totals, with_garbage.totals);
    }

    #[test]
    fn test_turn_count_matches_assistant_entries() {
        let asst = r#"{"type":"assistant","timestamp":"2024-05-01T10:01:00Z","message":{"model":"claude-sonnet-4","content":[{"type":"text","text":"more"}],"usage":{"input_tokens":1,"output_tokens":1}}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT, asst, asst]);
        assert_eq!(parsed.turns.len(), 3);
        // Continuations without a fresh user entry carry no user message
        assert!(parsed.turns[1].user_message.is_none());
        assert!(parsed.turns[2].user_message.is_none());
    }

    #[test]
    fn test_activity_counts_sum_equals_tool_call_count() {
        let asst = r#"{"type":"assistant","timestamp":"2024-05-01T10:01:00Z","message":{"model":"claude-sonnet-4","content":[{"type":"tool_use","id":"toolu_2","name":"Bash","input":{"command":"pnpm test"}},{"type":"tool_use","id":"toolu_3","name":"Bash","input":{"command":"npm install"}}],"usage":{"input_tokens":1,"output_tokens":1}}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT, asst]);

        assert_eq!(
            parsed.totals.activity_counts.total() as usize,
            parsed.total_tool_calls()
        );
        assert_eq!(parsed.totals.activity_counts.get(ActivityKind::Test), 1);
        assert_eq!(parsed.totals.activity_counts.get(ActivityKind::Setup), 1);
    }

    #[test]
    fn test_tool_results_recorded_last_write_wins() {
        let result_a = r#"{"type":"user","timestamp":"2024-05-01T10:00:10Z","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_1","content":"first"}]}}"#;
        let result_b = r#"{"type":"user","timestamp":"2024-05-01T10:00:11Z","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_1","content":"second"}]}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT, result_a, result_b]);

        assert_eq!(parsed.tool_results.len(), 1);
        assert_eq!(parsed.tool_results["toolu_1"], "second");
    }

    #[test]
    fn test_tool_result_only_user_entry_leaves_message_null() {
        let result_entry = r#"{"type":"user","timestamp":"2024-05-01T10:00:10Z","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_1","content":"ok"}]}}"#;
        let asst = r#"{"type":"assistant","timestamp":"2024-05-01T10:00:20Z","message":{"model":"claude-sonnet-4","content":[{"type":"text","text":"continuing"}],"usage":{"input_tokens":1,"output_tokens":1}}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT, result_entry, asst]);

        let continuation = &parsed.turns[1];
        assert!(continuation.user_message.is_none());
        // The tool-result entry's timestamp still anchors the turn start
        assert_eq!(
            continuation.user_timestamp.as_deref(),
            Some("2024-05-01T10:00:10Z")
        );
    }

    #[test]
    fn test_thinking_blocks_never_surface() {
        let asst = r#"{"type":"assistant","timestamp":"2024-05-01T10:00:05Z","message":{"model":"claude-sonnet-4","content":[{"type":"thinking","thinking":"secret reasoning"},{"type":"text","text":"visible"}],"usage":{"input_tokens":1,"output_tokens":1}}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, asst]);

        assert_eq!(parsed.turns[0].assistant.text.as_deref(), Some("visible"));
        let serialized = serde_json::to_string(&parsed).expect("serialize parse result");
        assert!(!serialized.contains("secret reasoning"));
    }

    #[test]
    fn test_summary_sets_workspace_metadata_once() {
        let summary_a = r#"{"type":"summary","cwd":"/repo","git_branch":"main"}"#;
        let summary_b = r#"{"type":"summary","cwd":"/elsewhere","git_branch":"dev"}"#;
        let parsed = parse_lines(&[summary_a, summary_b, USER_FIX_BUG, ASSISTANT_EDIT]);

        assert_eq!(parsed.session_metadata.cwd.as_deref(), Some("/repo"));
        assert_eq!(parsed.session_metadata.git_branch.as_deref(), Some("main"));
    }

    #[test]
    fn test_model_metadata_set_at_most_once() {
        let second_model = r#"{"type":"assistant","timestamp":"2024-05-01T10:01:00Z","message":{"model":"claude-haiku-3","content":[{"type":"text","text":"quick"}],"usage":{"input_tokens":1,"output_tokens":1}}}"#;
        let parsed = parse_lines(&[USER_FIX_BUG, ASSISTANT_EDIT, second_model]);

        assert_eq!(
            parsed.session_metadata.model.as_deref(),
            Some("claude-sonnet-4")
        );
        // Per-turn model still reflects each entry
        assert_eq!(
            parsed.turns[1].assistant.model.as_deref(),
            Some("claude-haiku-3")
        );
    }

    #[test]
    fn test_tilde_path_expands_to_home() {
        let home = tempfile::tempdir().expect("create temp home");
        std::fs::write(
            home.path().join("transcript.jsonl"),
            format!("{}\n{}\n", USER_FIX_BUG, ASSISTANT_EDIT),
        )
        .expect("write transcript");

        // set_var is unsafe as of edition 2024; no other test in this
        // crate reads HOME
        unsafe { std::env::set_var("HOME", home.path()) };
        let parsed = parse_transcript("~/transcript.jsonl");

        assert_eq!(parsed.turns.len(), 1);
        assert_eq!(parsed.turns[0].user_message.as_deref(), Some("fix bug"));
    }

    #[test]
    fn test_empty_lines_are_skipped() {
        let parsed = parse_lines(&[USER_FIX_BUG, "", "   ", ASSISTANT_EDIT]);
        assert_eq!(parsed.turns.len(), 1);
    }
}

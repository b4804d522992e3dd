use crate::background::{
    BackgroundCorrelator, PendingBackgroundTask, task_output_request, umbrella_span_body,
};
use crate::events::{GenerationBody, IngestionEvent, SpanBody, TraceBody, UsageDetails};
use crate::ids::deterministic_id;
use crate::timeline::{TurnTimeline, parse_opt_timestamp};
use chrono::Utc;
use serde_json::{Map, Value, json};
use tracelift_types::{OrchestrationContext, ParsedTranscript};
use uuid::Uuid;

/// Ordered batch ready for the ingestion sink, plus the ids of background
/// tasks whose completion was never observed in the log.
#[derive(Debug)]
pub struct AssembledBatch {
    pub events: Vec<IngestionEvent>,
    pub pending_background: Vec<String>,
}

/// Build the full trace/generation/span batch for one parsed session.
///
/// Emits the trace record first, then one generation per turn with its
/// tool-call spans nested under it, all in log order. Umbrella spans for
/// background tasks are inserted at the point their completion was
/// detected but parented under the generation that started them and
/// timestamped with their true start.
pub fn assemble(
    session_id: &str,
    parsed: &ParsedTranscript,
    context: &OrchestrationContext,
    account_id: Option<&str>,
) -> AssembledBatch {
    let now = Utc::now();
    let ingested_at = now.to_rfc3339();

    // Wall-clock now is the last resort, used only when the session
    // contains no parsable timestamps at all
    let first_timestamp = parsed
        .turns
        .iter()
        .find_map(|turn| parse_opt_timestamp(turn.user_timestamp.as_deref()))
        .or_else(|| {
            parsed
                .turns
                .iter()
                .find_map(|turn| parse_opt_timestamp(turn.assistant.timestamp.as_deref()))
        })
        .unwrap_or(now);

    let first_user_message = parsed
        .turns
        .iter()
        .find_map(|turn| turn.user_message.clone());
    let last_assistant_text = parsed
        .turns
        .iter()
        .rev()
        .find_map(|turn| turn.assistant.text.clone());

    let mut metadata = json!({
        "source": "claude-code",
        "hook": "tracelift",
        "session_id": session_id,
        "model": parsed.session_metadata.model,
        "git_branch": parsed.session_metadata.git_branch,
        "cwd": parsed.session_metadata.cwd,
        "activity_counts": parsed.totals.activity_counts,
        "total_tool_calls": parsed.total_tool_calls(),
        "token_totals": parsed.totals.usage,
    });
    if let Value::Object(map) = &mut metadata {
        for (name, value) in context.fields() {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
    }

    let mut tags = vec!["claude-code".to_string()];
    if context.task_id.is_some() {
        tags.push("orchestrated".to_string());
    }
    if let Some(purpose) = &context.execution_purpose {
        tags.push(purpose.clone());
    }

    let mut events = Vec::new();
    events.push(IngestionEvent::trace_create(
        TraceBody {
            id: session_id.to_string(),
            name: "claude-code-session".to_string(),
            // The orchestrator task id groups every run for the same task
            session_id: context.task_id.clone(),
            user_id: account_id.map(str::to_string),
            input: first_user_message,
            output: last_assistant_text,
            metadata,
            tags: Some(tags),
            timestamp: first_timestamp,
        },
        &ingested_at,
    ));

    let mut timeline = TurnTimeline::new(first_timestamp);
    let mut correlator = BackgroundCorrelator::new();

    for (index, turn) in parsed.turns.iter().enumerate() {
        let user_ts = parse_opt_timestamp(turn.user_timestamp.as_deref());
        let assistant_ts = parse_opt_timestamp(turn.assistant.timestamp.as_deref());
        let (start_time, end_time) = timeline.resolve(user_ts, assistant_ts);

        // Seeded from transcript fields that are identical when another
        // session replays this turn, so the backend upserts
        let generation_id = deterministic_id(&format!(
            "{}|{}|{}",
            turn.user_timestamp.as_deref().unwrap_or(""),
            turn.assistant.timestamp.as_deref().unwrap_or(""),
            turn.user_message.as_deref().unwrap_or(""),
        ));

        events.push(IngestionEvent::generation_create(
            GenerationBody {
                id: generation_id.clone(),
                trace_id: session_id.to_string(),
                name: format!("llm-response-{index}"),
                model: turn.assistant.model.clone(),
                input: turn.user_message.clone(),
                output: turn.assistant.text.clone(),
                start_time,
                end_time,
                usage_details: UsageDetails::from(&turn.assistant.usage),
                metadata: json!({ "tool_call_count": turn.assistant.tool_calls.len() }),
            },
            &ingested_at,
        ));

        for call in &turn.assistant.tool_calls {
            let tool_output = call
                .tool_use_id
                .as_deref()
                .and_then(|id| parsed.tool_results.get(id));

            let mut span_metadata = Map::new();
            span_metadata.insert("activity_kind".to_string(), json!(call.activity_kind));
            span_metadata.insert("tool_use_id".to_string(), json!(call.tool_use_id));

            if call.tool_name == "Bash"
                && let Some(output) = tool_output
                && let Some(task_id) = BackgroundCorrelator::extract_task_id(output)
            {
                correlator.register_start(
                    task_id.clone(),
                    PendingBackgroundTask {
                        origin_tool_use_id: call.tool_use_id.clone().unwrap_or_default(),
                        generation_id: generation_id.clone(),
                        activity_kind: call.activity_kind,
                        tool_name: call.tool_name.clone(),
                        start_time,
                        command: call
                            .tool_input
                            .get("command")
                            .and_then(Value::as_str)
                            .map(str::to_string),
                    },
                );
                span_metadata.insert("is_background_start".to_string(), json!(true));
                span_metadata.insert("background_task_id".to_string(), json!(task_id));
            }

            if let Some((task_id, blocking)) =
                task_output_request(&call.tool_name, &call.tool_input)
                && blocking
                && let Some(task) = correlator.complete(&task_id)
            {
                let wall_seconds = (end_time - task.start_time).num_milliseconds() as f64 / 1000.0;
                events.push(IngestionEvent::span_create(
                    umbrella_span_body(&task_id, &task, end_time, session_id),
                    &ingested_at,
                ));
                span_metadata.insert("is_background_completion".to_string(), json!(true));
                span_metadata.insert("background_task_id".to_string(), json!(task_id));
                span_metadata.insert(
                    "background_wall_time_seconds".to_string(),
                    json!(wall_seconds),
                );
            }

            // Without a tool_use_id there is nothing stable to seed from,
            // so the record cannot be upserted across runs
            let span_id = match call.tool_use_id.as_deref() {
                Some(id) => deterministic_id(id),
                None => Uuid::new_v4().simple().to_string(),
            };

            events.push(IngestionEvent::span_create(
                SpanBody {
                    id: span_id,
                    trace_id: session_id.to_string(),
                    parent_observation_id: generation_id.clone(),
                    name: format!("{}/{}", call.activity_kind, call.tool_name),
                    input: call.tool_input.clone(),
                    output: tool_output.cloned(),
                    start_time,
                    end_time,
                    metadata: Value::Object(span_metadata),
                },
                &ingested_at,
            ));
        }
    }

    AssembledBatch {
        events,
        pending_background: correlator.drain_pending(),
    }
}

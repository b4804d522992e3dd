use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracelift_types::UsageTotals;
use uuid::Uuid;

/// One entry of an ingestion batch.
///
/// The envelope id is a fresh UUID, unique per request as the ingestion
/// API requires; the body id is deterministic so that re-ingesting the
/// same source data updates existing records instead of duplicating them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
#[serde(rename_all = "kebab-case")]
pub enum IngestionEvent {
    TraceCreate(EventEnvelope<TraceBody>),
    GenerationCreate(EventEnvelope<GenerationBody>),
    SpanCreate(EventEnvelope<SpanBody>),
}

impl IngestionEvent {
    pub fn trace_create(body: TraceBody, ingested_at: &str) -> Self {
        Self::TraceCreate(EventEnvelope::new(body, ingested_at))
    }

    pub fn generation_create(body: GenerationBody, ingested_at: &str) -> Self {
        Self::GenerationCreate(EventEnvelope::new(body, ingested_at))
    }

    pub fn span_create(body: SpanBody, ingested_at: &str) -> Self {
        Self::SpanCreate(EventEnvelope::new(body, ingested_at))
    }

    /// The wire discriminant for this event
    pub fn kind(&self) -> &'static str {
        match self {
            IngestionEvent::TraceCreate(_) => "trace-create",
            IngestionEvent::GenerationCreate(_) => "generation-create",
            IngestionEvent::SpanCreate(_) => "span-create",
        }
    }

    /// The deterministic record id carried in the body
    pub fn record_id(&self) -> &str {
        match self {
            IngestionEvent::TraceCreate(event) => &event.body.id,
            IngestionEvent::GenerationCreate(event) => &event.body.id,
            IngestionEvent::SpanCreate(event) => &event.body.id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEnvelope<T> {
    pub id: String,
    pub timestamp: String,
    pub body: T,
}

impl<T> EventEnvelope<T> {
    fn new(body: T, ingested_at: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: ingested_at.to_string(),
            body,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceBody {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub metadata: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationBody {
    pub id: String,
    pub trace_id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub usage_details: UsageDetails,
    pub metadata: Value,
}

/// Token usage in the backend's expected shape; the cache key names drive
/// its cost calculation and must not change.
#[derive(Debug, Clone, Serialize)]
pub struct UsageDetails {
    pub input: u64,
    pub output: u64,
    pub total: u64,
    pub input_cache_read: u64,
    pub input_cache_creation: u64,
}

impl From<&UsageTotals> for UsageDetails {
    fn from(usage: &UsageTotals) -> Self {
        Self {
            input: usage.input_tokens,
            output: usage.output_tokens,
            total: usage.input_tokens + usage.output_tokens,
            input_cache_read: usage.cache_read_input_tokens,
            input_cache_creation: usage.cache_creation_input_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanBody {
    pub id: String,
    pub trace_id: String,
    pub parent_observation_id: String,
    pub name: String,
    pub input: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub metadata: Value,
}

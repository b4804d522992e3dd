use chrono::{DateTime, Utc};

/// Parse an RFC3339 transcript timestamp, tolerating a trailing `Z` and
/// fractional seconds. Unparsable input is None, never an error; the
/// caller owns the fallback policy.
pub fn parse_timestamp(ts: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn parse_opt_timestamp(ts: Option<&str>) -> Option<DateTime<Utc>> {
    ts.and_then(parse_timestamp)
}

/// Resolves a defined start/end instant for every turn from partial
/// timestamp data.
///
/// Start: the turn's own user timestamp, else the previous turn's end,
/// else the first timestamp seen in the session. End: the assistant
/// timestamp, else the start (zero duration). The previous end is updated
/// after every turn regardless of which rule fired, so a gap never
/// propagates a stale value forward.
pub struct TurnTimeline {
    first_timestamp: DateTime<Utc>,
    prev_end: Option<DateTime<Utc>>,
}

impl TurnTimeline {
    pub fn new(first_timestamp: DateTime<Utc>) -> Self {
        Self {
            first_timestamp,
            prev_end: None,
        }
    }

    pub fn resolve(
        &mut self,
        user_ts: Option<DateTime<Utc>>,
        assistant_ts: Option<DateTime<Utc>>,
    ) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = user_ts.or(self.prev_end).unwrap_or(self.first_timestamp);
        let end = assistant_ts.unwrap_or(start);
        self.prev_end = Some(end);
        (start, end)
    }
}

use crate::config::Config;
use crate::error::{Error, Result};
use serde_json::json;
use tracelift_engine::IngestionEvent;

/// Transport boundary for assembled batches.
///
/// The assembler hands a whole session over as one ordered unit; partial
/// delivery is the sink's concern, not the assembler's.
pub trait IngestionSink {
    fn send_batch(&self, batch: &[IngestionEvent]) -> Result<()>;
}

/// Posts batches to a Langfuse-compatible `/api/public/ingestion`
/// endpoint with basic auth.
pub struct HttpSink {
    client: reqwest::blocking::Client,
    host: String,
    public_key: String,
    secret_key: String,
}

impl HttpSink {
    /// None when credentials are missing - the sink-unavailable case,
    /// which the caller reports as a warning and otherwise ignores
    pub fn from_config(config: &Config) -> Option<Self> {
        let public_key = config.public_key.clone()?;
        let secret_key = config.secret_key.clone()?;
        Some(Self {
            client: reqwest::blocking::Client::new(),
            host: config.host.clone(),
            public_key,
            secret_key,
        })
    }
}

impl IngestionSink for HttpSink {
    fn send_batch(&self, batch: &[IngestionEvent]) -> Result<()> {
        let url = format!("{}/api/public/ingestion", self.host.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.public_key, Some(&self.secret_key))
            .json(&json!({ "batch": batch }))
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Sink(format!(
                "ingestion endpoint returned {}",
                status
            )));
        }
        Ok(())
    }
}

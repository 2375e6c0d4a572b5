//! Remote ingestion sink.
//!
//! Batches are split into chunks of at most [`CHUNK_SIZE`] records and
//! delivered strictly in order. HTTP 429 triggers a `Retry-After` sleep
//! and a retry of the same chunk; any other failure aborts the whole
//! send. The HTTP client and bearer token are created lazily on first
//! send and released on close.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::{ENV_API_TOKEN, IngestConfig};
use crate::error::{Error, Result};
use crate::outputs::OutputSink;

pub const CHUNK_SIZE: usize = 500;
pub const MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 5;
pub const API_VERSION: &str = "2023-01-01";

/// Outcome of posting one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostResponse {
    Accepted,
    RateLimited { retry_after_secs: u64 },
}

/// Transport seam between the sink's retry policy and the wire.
#[async_trait]
pub trait IngestTransport: Send + Sync {
    /// Acquire a bearer token for the session.
    async fn acquire_token(&self) -> Result<String>;

    /// Post one chunk. Transport failures and non-retryable HTTP statuses
    /// are `Err`; 429 maps to [`PostResponse::RateLimited`].
    async fn post(&self, url: &str, token: &str, chunk: &[Value]) -> Result<PostResponse>;
}

/// Real HTTP transport over reqwest.
pub struct HttpTransport {
    client: reqwest::Client,
    api_token: Option<String>,
}

impl HttpTransport {
    pub fn new(api_token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Ingestion(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, api_token })
    }
}

#[async_trait]
impl IngestTransport for HttpTransport {
    async fn acquire_token(&self) -> Result<String> {
        if let Some(token) = &self.api_token {
            return Ok(token.clone());
        }
        std::env::var(ENV_API_TOKEN)
            .ok()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::Authentication(format!(
                    "no API token configured; set {ENV_API_TOKEN} or ingest.api_token"
                ))
            })
    }

    async fn post(&self, url: &str, token: &str, chunk: &[Value]) -> Result<PostResponse> {
        let response = self
            .client
            .post(url)
            .bearer_auth(token)
            .json(chunk)
            .send()
            .await
            .map_err(|e| Error::Ingestion(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_success() {
            return Ok(PostResponse::Accepted);
        }
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Ok(PostResponse::RateLimited { retry_after_secs });
        }
        let body = response.text().await.unwrap_or_default();
        Err(Error::Ingestion(format!(
            "ingestion endpoint returned {status}: {body}"
        )))
    }
}

struct Session {
    token: String,
}

/// Sink delivering to the remote ingestion API.
pub struct IngestSink {
    endpoint: String,
    rule_id: String,
    transport: Box<dyn IngestTransport>,
    session: Option<Session>,
}

impl IngestSink {
    pub fn from_config(config: &IngestConfig) -> Result<Self> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            Error::Configuration("ingest.endpoint is required for ingest output".into())
        })?;
        let rule_id = config.rule_id.clone().ok_or_else(|| {
            Error::Configuration("ingest.rule_id is required for ingest output".into())
        })?;
        let transport = Box::new(HttpTransport::new(config.api_token.clone())?);
        Ok(Self::with_transport(endpoint, rule_id, transport))
    }

    pub fn with_transport(
        endpoint: String,
        rule_id: String,
        transport: Box<dyn IngestTransport>,
    ) -> Self {
        Self {
            endpoint,
            rule_id,
            transport,
            session: None,
        }
    }

    fn stream_url(&self, stream_name: &str) -> String {
        format!(
            "{}/dataCollectionRules/{}/streams/{}?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.rule_id,
            stream_name,
            API_VERSION
        )
    }

    async fn session_token(&mut self) -> Result<&str> {
        if self.session.is_none() {
            let token = self.transport.acquire_token().await?;
            debug!("acquired ingestion token");
            self.session = Some(Session { token });
        }
        Ok(&self.session.as_ref().unwrap().token)
    }

    async fn send_chunk(&mut self, url: &str, chunk: &[Value], index: usize) -> Result<()> {
        for attempt in 1..=MAX_ATTEMPTS {
            let token = self.session_token().await?.to_string();
            match self.transport.post(url, &token, chunk).await? {
                PostResponse::Accepted => {
                    debug!(chunk = index, count = chunk.len(), "chunk accepted");
                    return Ok(());
                }
                PostResponse::RateLimited { retry_after_secs } => {
                    warn!(
                        chunk = index,
                        attempt, retry_after_secs, "rate limited, backing off"
                    );
                    if attempt < MAX_ATTEMPTS {
                        tokio::time::sleep(Duration::from_secs(retry_after_secs)).await;
                    }
                }
            }
        }
        Err(Error::RetriesExhausted(format!(
            "chunk {index} still rate limited after {MAX_ATTEMPTS} attempts"
        )))
    }
}

#[async_trait]
impl OutputSink for IngestSink {
    async fn send(&mut self, events: &[Value], stream_name: &str) -> Result<()> {
        if events.is_empty() {
            warn!(stream = %stream_name, "skipping empty batch");
            return Ok(());
        }
        let url = self.stream_url(stream_name);
        let chunks: Vec<&[Value]> = events.chunks(CHUNK_SIZE).collect();
        info!(
            count = events.len(),
            chunks = chunks.len(),
            stream = %stream_name,
            "uploading batch"
        );
        for (index, chunk) in chunks.into_iter().enumerate() {
            self.send_chunk(&url, chunk, index).await?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.session.take().is_some() {
            debug!("ingestion session closed");
        }
        Ok(())
    }
}

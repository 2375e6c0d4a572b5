//! Delivery sinks.
//!
//! A sink receives time-ordered batches and may chunk them, but never
//! reorders them. `close` runs exactly once after the scenario loop,
//! success or failure.

pub mod file;
pub mod ingest;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{AppConfig, OutputType};
use crate::error::Result;

pub use file::FileSink;
pub use ingest::{HttpTransport, IngestSink};

#[async_trait]
pub trait OutputSink: Send {
    /// Deliver one batch destined for `stream_name`. Empty batches are
    /// skipped with a warning.
    async fn send(&mut self, events: &[Value], stream_name: &str) -> Result<()>;

    /// Release held resources. Idempotent.
    async fn close(&mut self) -> Result<()>;
}

/// Writes each batch to stdout as pretty JSON.
#[derive(Debug, Default)]
pub struct ConsoleSink;

#[async_trait]
impl OutputSink for ConsoleSink {
    async fn send(&mut self, events: &[Value], stream_name: &str) -> Result<()> {
        if events.is_empty() {
            warn!(stream = %stream_name, "skipping empty batch");
            return Ok(());
        }
        println!(
            "{}",
            serde_json::to_string_pretty(events)
                .map_err(|e| crate::error::Error::Generation(e.to_string()))?
        );
        info!(count = events.len(), stream = %stream_name, "wrote batch to stdout");
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects batches in memory. Test and embedding aid.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub batches: Vec<(String, Vec<Value>)>,
    pub closed: bool,
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn send(&mut self, events: &[Value], stream_name: &str) -> Result<()> {
        if events.is_empty() {
            warn!(stream = %stream_name, "skipping empty batch");
            return Ok(());
        }
        self.batches.push((stream_name.to_string(), events.to_vec()));
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.closed = true;
        Ok(())
    }
}

/// Build the sink named by the configuration.
pub fn create_sink(config: &AppConfig) -> Result<Box<dyn OutputSink>> {
    match config.output.output_type {
        OutputType::Console => Ok(Box::new(ConsoleSink)),
        OutputType::File => Ok(Box::new(FileSink::from_config(&config.output)?)),
        OutputType::Ingest => Ok(Box::new(IngestSink::from_config(&config.ingest)?)),
    }
}

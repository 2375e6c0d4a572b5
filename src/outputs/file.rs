//! File sink: JSON array or JSON-lines output.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::{FileFormat, OutputConfig};
use crate::error::{Error, Result};
use crate::outputs::OutputSink;

/// Accumulates all batches and writes the file once on close, so a run
/// with several scenarios produces one well-formed document.
pub struct FileSink {
    path: PathBuf,
    format: FileFormat,
    events: Vec<Value>,
    written: bool,
}

impl FileSink {
    pub fn from_config(config: &OutputConfig) -> Result<Self> {
        let path = config.file_path.clone().ok_or_else(|| {
            Error::Configuration("output.file_path is required for file output".into())
        })?;
        Ok(Self {
            path,
            format: config.file_format,
            events: Vec::new(),
            written: false,
        })
    }

    fn render(&self) -> Result<String> {
        match self.format {
            FileFormat::Json => serde_json::to_string_pretty(&self.events)
                .map_err(|e| Error::Generation(e.to_string())),
            FileFormat::Jsonl => {
                let mut out = String::new();
                for event in &self.events {
                    out.push_str(
                        &serde_json::to_string(event)
                            .map_err(|e| Error::Generation(e.to_string()))?,
                    );
                    out.push('\n');
                }
                Ok(out)
            }
        }
    }
}

#[async_trait]
impl OutputSink for FileSink {
    async fn send(&mut self, events: &[Value], stream_name: &str) -> Result<()> {
        if events.is_empty() {
            warn!(stream = %stream_name, "skipping empty batch");
            return Ok(());
        }
        self.events.extend_from_slice(events);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if self.written {
            return Ok(());
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, self.render()?).await?;
        self.written = true;
        info!(path = %self.path.display(), count = self.events.len(), "wrote events to file");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(path: PathBuf, format: FileFormat) -> OutputConfig {
        OutputConfig {
            output_type: crate::config::OutputType::File,
            file_path: Some(path),
            file_format: format,
        }
    }

    #[tokio::test]
    async fn json_output_is_one_array_across_batches() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut sink = FileSink::from_config(&config(path.clone(), FileFormat::Json)).unwrap();
        sink.send(&[serde_json::json!({"n": 1})], "A").await.unwrap();
        sink.send(&[serde_json::json!({"n": 2})], "B").await.unwrap();
        sink.close().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["n"], 1);
        assert_eq!(parsed[1]["n"], 2);
    }

    #[tokio::test]
    async fn jsonl_output_is_one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let mut sink = FileSink::from_config(&config(path.clone(), FileFormat::Jsonl)).unwrap();
        sink.send(
            &[serde_json::json!({"n": 1}), serde_json::json!({"n": 2})],
            "A",
        )
        .await
        .unwrap();
        sink.close().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = raw.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["n"], 1);
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/events.json");
        let mut sink = FileSink::from_config(&config(path.clone(), FileFormat::Json)).unwrap();
        sink.send(&[serde_json::json!({})], "A").await.unwrap();
        sink.close().await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.json");
        let mut sink = FileSink::from_config(&config(path, FileFormat::Json)).unwrap();
        sink.send(&[serde_json::json!({})], "A").await.unwrap();
        sink.close().await.unwrap();
        sink.close().await.unwrap();
    }
}

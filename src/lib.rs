//! # logsynth - Security Log Scenario Synthesizer
//!
//! Generates realistic security log events for configurable attack and
//! baseline scenarios and delivers them to the console, a file, or a
//! remote log-ingestion API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        logsynth                             │
//! │                                                             │
//! │  ┌──────────────┐   ┌─────────────────┐   ┌──────────────┐  │
//! │  │  AppConfig   │──▶│  ScenarioEngine │──▶│  OutputSink  │  │
//! │  │ (yaml + env) │   │  (per scenario) │   │ console/file │  │
//! │  └──────────────┘   └────────┬────────┘   │   /ingest    │  │
//! │                              │            └──────────────┘  │
//! │                     ┌────────▼────────┐                     │
//! │                     │ EventGenerator  │                     │
//! │                     │  security_event │                     │
//! │                     │  signin_logs    │                     │
//! │                     │  syslog         │                     │
//! │                     │  common_sec_log │                     │
//! │                     └─────────────────┘                     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Design Principles
//!
//! 1. **Schema-typed records** - every log type has a serde struct with the
//!    destination table's field names; generators never emit ad-hoc JSON.
//!
//! 2. **Deterministic when seeded** - each generator owns its RNG, so a
//!    seeded run reproduces byte-identical batches.
//!
//! 3. **Sinks chunk, never reorder** - batches arrive time-sorted and the
//!    delivery layer preserves that order through chunking and retries.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logsynth::{config, engine, outputs};
//!
//! # async fn demo() -> logsynth::Result<()> {
//! let cfg = config::load_config(
//!     std::path::Path::new("config.yaml"),
//!     config::Overrides::default(),
//! )?;
//! let mut sink = outputs::create_sink(&cfg)?;
//! let summary = engine::run(&cfg, sink.as_mut()).await?;
//! println!("{}", serde_json::to_string_pretty(&summary).unwrap());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod generators;
pub mod outputs;
pub mod schema;
pub mod server;
pub mod timeline;

pub use config::{AppConfig, Overrides, load_config};
pub use engine::{RunSummary, ScenarioOutcome};
pub use error::{Error, Result};
pub use generators::{EventGenerator, create_generator, list_log_types};
pub use outputs::{ConsoleSink, FileSink, IngestSink, MemorySink, OutputSink, create_sink};
pub use timeline::TimeWindow;

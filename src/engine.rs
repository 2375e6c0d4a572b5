//! Scenario engine.
//!
//! Runs the configured scenarios in declaration order against one sink.
//! A scenario that fails to generate or deliver is recorded in the
//! summary and the run moves on; only configuration problems abort the
//! whole run before any generation starts.

use serde::Serialize;
use tracing::{error, info, warn};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generators;
use crate::outputs::OutputSink;
use crate::timeline::TimeWindow;

/// Per-scenario outcome. `status` is either `"success"` or
/// `"error: <message>"`.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioOutcome {
    pub name: String,
    pub log_type: String,
    pub stream_name: String,
    pub events_generated: usize,
    pub status: String,
}

impl ScenarioOutcome {
    pub fn succeeded(&self) -> bool {
        self.status == "success"
    }
}

#[derive(Debug, Clone, Serialize, Default)]
pub struct RunSummary {
    pub total_events: usize,
    pub scenarios: Vec<ScenarioOutcome>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.scenarios.iter().all(ScenarioOutcome::succeeded)
    }
}

/// Validate every scenario's log type before generating anything, then run
/// them all. The sink is closed exactly once, whatever happened inside the
/// loop.
pub async fn run(config: &AppConfig, sink: &mut dyn OutputSink) -> Result<RunSummary> {
    let window = config.window()?;

    for scenario in &config.scenarios {
        if !generators::is_registered(&scenario.log_type) {
            return Err(Error::Configuration(format!(
                "scenario '{}' uses unknown log_type '{}'",
                scenario.name, scenario.log_type
            )));
        }
    }

    let summary = run_scenarios(config, &window, sink).await;
    if let Err(e) = sink.close().await {
        // The per-scenario results still matter when only teardown failed;
        // log them before surfacing the error, since the caller only sees `e`.
        let rendered = serde_json::to_string(&summary).unwrap_or_default();
        error!(error = %e, summary = %rendered, "failed to close sink");
        return Err(e);
    }
    Ok(summary)
}

async fn run_scenarios(
    config: &AppConfig,
    window: &TimeWindow,
    sink: &mut dyn OutputSink,
) -> RunSummary {
    let mut summary = RunSummary::default();

    for scenario in &config.scenarios {
        let count = scenario.resolved_count(config.generation.count) as usize;
        let stream_name = scenario.resolved_stream(&config.ingest.stream_name);
        info!(
            scenario = %scenario.name,
            log_type = %scenario.log_type,
            count,
            stream = %stream_name,
            "running scenario"
        );

        let outcome = match run_one(scenario, count, window, &stream_name, config, sink).await {
            Ok(generated) => ScenarioOutcome {
                name: scenario.name.clone(),
                log_type: scenario.log_type.clone(),
                stream_name,
                events_generated: generated,
                status: "success".to_string(),
            },
            Err(e) => {
                warn!(scenario = %scenario.name, error = %e, "scenario failed");
                ScenarioOutcome {
                    name: scenario.name.clone(),
                    log_type: scenario.log_type.clone(),
                    stream_name,
                    events_generated: 0,
                    status: format!("error: {e}"),
                }
            }
        };
        if outcome.succeeded() {
            summary.total_events += outcome.events_generated;
        }
        summary.scenarios.push(outcome);
    }

    info!(
        total_events = summary.total_events,
        scenarios = summary.scenarios.len(),
        "run complete"
    );
    summary
}

async fn run_one(
    scenario: &crate::config::ScenarioConfig,
    count: usize,
    window: &TimeWindow,
    stream_name: &str,
    config: &AppConfig,
    sink: &mut dyn OutputSink,
) -> Result<usize> {
    let params = generators::Params::from(&scenario.parameters);
    let mut generator =
        generators::create_generator(&scenario.log_type, params, config.generation.seed)?;
    let batch = generator.generate(count, window)?;
    let generated = batch.len();
    sink.send(&batch, stream_name).await?;
    Ok(generated)
}

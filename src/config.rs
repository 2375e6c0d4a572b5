//! Configuration loading: YAML file, environment overrides, CLI overrides.
//!
//! Precedence for ingest settings: environment variable > file value.
//! Precedence for output type and count: CLI flag > file value.
//! All validation happens up front; nothing is generated from a config
//! that fails validation.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::timeline::TimeWindow;

pub const ENV_ENDPOINT: &str = "LOGSYNTH_ENDPOINT";
pub const ENV_RULE_ID: &str = "LOGSYNTH_RULE_ID";
pub const ENV_STREAM_NAME: &str = "LOGSYNTH_STREAM_NAME";
pub const ENV_API_TOKEN: &str = "LOGSYNTH_API_TOKEN";

/// Default destination stream per log type; a scenario's own `stream_name`
/// wins over this, and this wins over the configured default stream.
pub const LOG_TYPE_STREAM_MAP: &[(&str, &str)] = &[
    ("security_event", "Custom-SecurityEventDemo_CL"),
    ("signin_logs", "Custom-SigninLogDemo_CL"),
    ("syslog", "Custom-SyslogDemo_CL"),
    ("common_security_log", "Custom-CommonSecurityLogDemo_CL"),
];

#[derive(Debug, Clone, Deserialize, Default)]
pub struct IngestConfig {
    /// Ingestion endpoint base URL.
    pub endpoint: Option<String>,
    /// Collection rule identifier the streams hang off.
    pub rule_id: Option<String>,
    /// Default stream name when neither the scenario nor the log type
    /// supplies one.
    #[serde(default = "default_stream_name")]
    pub stream_name: String,
    /// Bearer token for the ingestion API. Usually supplied via
    /// `LOGSYNTH_API_TOKEN` rather than the file.
    pub api_token: Option<String>,
}

fn default_stream_name() -> String {
    "Custom-SecurityEventDemo_CL".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputType {
    Console,
    File,
    Ingest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    #[default]
    Json,
    Jsonl,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "type", default = "default_output_type")]
    pub output_type: OutputType,
    pub file_path: Option<PathBuf>,
    #[serde(default)]
    pub file_format: FileFormat,
}

fn default_output_type() -> OutputType {
    OutputType::Console
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_type: OutputType::Console,
            file_path: None,
            file_format: FileFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimeRangeConfig {
    pub start: String,
    pub end: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Default event count per scenario.
    #[serde(default = "default_count")]
    pub count: u64,
    pub time_range: TimeRangeConfig,
    /// Seed for reproducible output; omitted means OS entropy.
    pub seed: Option<u64>,
}

fn default_count() -> u64 {
    100
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioConfig {
    pub name: String,
    pub log_type: String,
    #[serde(default)]
    pub description: String,
    /// Per-scenario destination stream override.
    pub stream_name: Option<String>,
    /// Generator-specific knobs, interpreted only by the matching generator.
    #[serde(default)]
    pub parameters: serde_json::Map<String, serde_json::Value>,
    /// Per-scenario event count override.
    pub count: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub generation: GenerationConfig,
    #[serde(default)]
    pub scenarios: Vec<ScenarioConfig>,
}

/// CLI overrides applied on top of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub output: Option<OutputType>,
    pub count: Option<u64>,
}

pub fn load_config(path: &Path, overrides: Overrides) -> Result<AppConfig> {
    if !path.exists() {
        return Err(Error::Configuration(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }
    let raw = std::fs::read_to_string(path)?;
    let mut config: AppConfig = serde_yaml::from_str(&raw)
        .map_err(|e| Error::Configuration(format!("failed to parse config: {e}")))?;

    apply_env_overrides(&mut config);

    if let Some(output) = overrides.output {
        config.output.output_type = output;
    }
    if let Some(count) = overrides.count {
        config.generation.count = count;
    }

    config.validate()?;
    info!(path = %path.display(), scenarios = config.scenarios.len(), "configuration loaded");
    Ok(config)
}

fn apply_env_overrides(config: &mut AppConfig) {
    let from_env = |var: &str| {
        let value = std::env::var(var).ok().filter(|v| !v.is_empty());
        if value.is_some() {
            debug!(var, "overriding ingest setting from environment");
        }
        value
    };
    if let Some(v) = from_env(ENV_ENDPOINT) {
        config.ingest.endpoint = Some(v);
    }
    if let Some(v) = from_env(ENV_RULE_ID) {
        config.ingest.rule_id = Some(v);
    }
    if let Some(v) = from_env(ENV_STREAM_NAME) {
        config.ingest.stream_name = v;
    }
    if let Some(v) = from_env(ENV_API_TOKEN) {
        config.ingest.api_token = Some(v);
    }
}

impl AppConfig {
    /// Structural validation. Log-type validation lives with the generator
    /// registry and runs before generation as well.
    pub fn validate(&self) -> Result<()> {
        self.window()?;
        match self.output.output_type {
            OutputType::File => {
                if self.output.file_path.is_none() {
                    return Err(Error::Configuration(
                        "output.file_path is required when output.type is 'file'".into(),
                    ));
                }
            }
            OutputType::Ingest => {
                if self.ingest.endpoint.is_none() || self.ingest.rule_id.is_none() {
                    return Err(Error::Configuration(
                        "ingest.endpoint and ingest.rule_id are required when output.type is 'ingest'"
                            .into(),
                    ));
                }
            }
            OutputType::Console => {}
        }
        Ok(())
    }

    pub fn window(&self) -> Result<TimeWindow> {
        TimeWindow::parse(
            &self.generation.time_range.start,
            &self.generation.time_range.end,
        )
    }
}

impl ScenarioConfig {
    /// Event count: scenario override > parameters override > global default.
    pub fn resolved_count(&self, default_count: u64) -> u64 {
        self.count
            .or_else(|| self.parameters.get("count").and_then(|v| v.as_u64()))
            .unwrap_or(default_count)
    }

    /// Stream name: scenario override > log-type default map > global default.
    pub fn resolved_stream(&self, default_stream: &str) -> String {
        if let Some(stream) = &self.stream_name {
            return stream.clone();
        }
        LOG_TYPE_STREAM_MAP
            .iter()
            .find(|(lt, _)| *lt == self.log_type)
            .map(|(_, stream)| stream.to_string())
            .unwrap_or_else(|| default_stream.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        r#"
generation:
  count: 25
  time_range:
    start: "2026-01-01T00:00:00Z"
    end: "2026-01-01T01:00:00Z"
scenarios:
  - name: ssh_attack
    log_type: syslog
    parameters:
      event_type: ssh_brute_force
      attacker_ip: "203.0.113.50"
"#
    }

    #[test]
    fn parses_minimal_config() {
        let config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        assert_eq!(config.generation.count, 25);
        assert_eq!(config.output.output_type, OutputType::Console);
        assert_eq!(config.scenarios.len(), 1);
        assert_eq!(
            config.scenarios[0].parameters["attacker_ip"],
            "203.0.113.50"
        );
    }

    #[test]
    fn count_resolution_precedence() {
        let mut scenario: ScenarioConfig = serde_yaml::from_str(
            r#"
name: s
log_type: syslog
parameters:
  count: 7
"#,
        )
        .unwrap();
        assert_eq!(scenario.resolved_count(100), 7);
        scenario.count = Some(3);
        assert_eq!(scenario.resolved_count(100), 3);
        scenario.count = None;
        scenario.parameters.remove("count");
        assert_eq!(scenario.resolved_count(100), 100);
    }

    #[test]
    fn stream_resolution_precedence() {
        let mut scenario: ScenarioConfig =
            serde_yaml::from_str("name: s\nlog_type: syslog").unwrap();
        assert_eq!(scenario.resolved_stream("Default_CL"), "Custom-SyslogDemo_CL");
        scenario.stream_name = Some("Custom-Override_CL".into());
        assert_eq!(scenario.resolved_stream("Default_CL"), "Custom-Override_CL");
        scenario.stream_name = None;
        scenario.log_type = "unknown_type".into();
        assert_eq!(scenario.resolved_stream("Default_CL"), "Default_CL");
    }

    #[test]
    fn file_output_requires_path() {
        let mut config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.output.output_type = OutputType::File;
        assert!(matches!(
            config.validate(),
            Err(Error::Configuration(_))
        ));
        config.output.file_path = Some("out/events.json".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ingest_output_requires_endpoint_and_rule() {
        let mut config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.output.output_type = OutputType::Ingest;
        assert!(config.validate().is_err());
        config.ingest.endpoint = Some("https://ingest.example.com".into());
        config.ingest.rule_id = Some("dcr-0000".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_config_file_is_a_configuration_error() {
        let err = load_config(Path::new("/nonexistent/logsynth.yaml"), Overrides::default())
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn cli_overrides_win_over_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                "{}\noutput:\n  type: file\n  file_path: out/events.json\n",
                minimal_yaml()
            ),
        )
        .unwrap();

        let overrides = Overrides {
            output: Some(OutputType::Console),
            count: Some(9),
        };
        let config = load_config(&path, overrides).unwrap();
        assert_eq!(config.output.output_type, OutputType::Console);
        assert_eq!(config.generation.count, 9);

        let config = load_config(&path, Overrides::default()).unwrap();
        assert_eq!(config.output.output_type, OutputType::File);
        assert_eq!(config.generation.count, 25);
    }

    // One test owns the LOGSYNTH_* variables; splitting it up would race
    // under the parallel test runner.
    #[test]
    fn env_overrides_win_over_file_ingest_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            format!(
                "{}\ningest:\n  endpoint: https://file.example.com\n  rule_id: dcr-file\n  stream_name: Custom-FromFile_CL\n",
                minimal_yaml()
            ),
        )
        .unwrap();

        unsafe {
            std::env::set_var(ENV_ENDPOINT, "https://env.example.com");
            std::env::set_var(ENV_RULE_ID, "dcr-env");
            std::env::set_var(ENV_STREAM_NAME, "Custom-FromEnv_CL");
            std::env::set_var(ENV_API_TOKEN, "env-token");
        }
        let config = load_config(&path, Overrides::default()).unwrap();
        unsafe {
            std::env::remove_var(ENV_ENDPOINT);
            std::env::remove_var(ENV_RULE_ID);
            std::env::remove_var(ENV_STREAM_NAME);
            std::env::remove_var(ENV_API_TOKEN);
        }
        assert_eq!(config.ingest.endpoint.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.ingest.rule_id.as_deref(), Some("dcr-env"));
        assert_eq!(config.ingest.stream_name, "Custom-FromEnv_CL");
        assert_eq!(config.ingest.api_token.as_deref(), Some("env-token"));

        // Empty variables do not override the file.
        unsafe {
            std::env::set_var(ENV_ENDPOINT, "");
        }
        let config = load_config(&path, Overrides::default()).unwrap();
        unsafe {
            std::env::remove_var(ENV_ENDPOINT);
        }
        assert_eq!(config.ingest.endpoint.as_deref(), Some("https://file.example.com"));
        assert_eq!(config.ingest.rule_id.as_deref(), Some("dcr-file"));
    }

    #[test]
    fn bad_time_range_is_config_error() {
        let mut config: AppConfig = serde_yaml::from_str(minimal_yaml()).unwrap();
        config.generation.time_range.end = "2025-12-31T00:00:00Z".into();
        assert!(config.validate().is_err());
    }
}

//! Log-type generators.
//!
//! Each generator turns (count, window, scenario parameters) into a batch
//! of schema-typed records. Generators own their randomness: a seeded
//! generator is a pure function of seed + draw order, so identical inputs
//! reproduce identical batches. Unrecognized parameter keys are ignored.

pub mod cef;
pub mod pools;
pub mod security_event;
pub mod signin;
pub mod syslog;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::timeline::TimeWindow;

pub use cef::CommonSecurityLogGenerator;
pub use security_event::SecurityEventGenerator;
pub use signin::SigninLogGenerator;
pub use syslog::SyslogGenerator;

/// A generator for one log type.
pub trait EventGenerator: Send {
    /// The registry identifier this generator answers to.
    fn log_type(&self) -> &'static str;

    /// Produce `count` records with timestamps drawn from `window`,
    /// sorted ascending by generation timestamp.
    fn generate(&mut self, count: usize, window: &TimeWindow) -> Result<Vec<Value>>;
}

impl std::fmt::Debug for dyn EventGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventGenerator")
            .field("log_type", &self.log_type())
            .finish()
    }
}

/// Scenario parameter mapping with typed accessors. Generators look up only
/// the keys they understand.
#[derive(Debug, Clone, Default)]
pub struct Params(serde_json::Map<String, Value>);

impl Params {
    pub fn new(map: serde_json::Map<String, Value>) -> Self {
        Self(map)
    }

    pub fn get_str(&self, key: &str) -> Option<String> {
        self.0.get(key).and_then(|v| v.as_str()).map(String::from)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.0.get(key).and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub fn get_u32_list(&self, key: &str) -> Option<Vec<u32>> {
        let list = self.0.get(key)?.as_array()?;
        Some(
            list.iter()
                .filter_map(|v| v.as_u64())
                .map(|v| v as u32)
                .collect(),
        )
    }
}

impl From<&serde_json::Map<String, Value>> for Params {
    fn from(map: &serde_json::Map<String, Value>) -> Self {
        Self(map.clone())
    }
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

/// Create a generator by log-type identifier.
///
/// Unknown identifiers are a configuration error; the engine checks every
/// scenario against this registry before generating anything.
pub fn create_generator(
    log_type: &str,
    params: Params,
    seed: Option<u64>,
) -> Result<Box<dyn EventGenerator>> {
    match log_type {
        "security_event" => Ok(Box::new(SecurityEventGenerator::new(params, seed))),
        "signin_logs" => Ok(Box::new(SigninLogGenerator::new(params, seed))),
        "syslog" => Ok(Box::new(SyslogGenerator::new(params, seed))),
        "common_security_log" => Ok(Box::new(CommonSecurityLogGenerator::new(params, seed))),
        other => {
            let supported: Vec<&str> = list_log_types().iter().map(|(name, _)| *name).collect();
            Err(Error::Configuration(format!(
                "unknown log_type '{}'; supported types: {}",
                other,
                supported.join(", ")
            )))
        }
    }
}

pub fn is_registered(log_type: &str) -> bool {
    list_log_types().iter().any(|(name, _)| *name == log_type)
}

/// All registered log types with a short description, for `logsynth list`.
pub fn list_log_types() -> Vec<(&'static str, &'static str)> {
    vec![
        ("security_event", "Windows Security events (4624, 4625, ...)"),
        ("signin_logs", "Entra ID sign-ins with attack-mode shaping"),
        ("syslog", "Linux/Unix syslog across auth, kernel, services"),
        ("common_security_log", "CEF events from network devices"),
    ]
}

//! Error taxonomy for logsynth.
//!
//! Four failure classes with different blast radii:
//! - Configuration errors fail the entire run before any generation starts.
//! - Authentication errors surface the first time the remote sink is used.
//! - Ingestion errors (including retry exhaustion) fail the current scenario.
//! - Generation errors are caught per scenario and recorded in the summary.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("ingestion error: {0}")]
    Ingestion(String),

    /// Distinct from [`Error::Ingestion`]: the chunk was retryable but the
    /// retry budget ran out.
    #[error("retries exhausted: {0}")]
    RetriesExhausted(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error class. Configuration problems get a
    /// distinct code so automation can tell "setup was wrong" from "some
    /// data failed to send".
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Configuration(_) => 2,
            _ => 1,
        }
    }
}

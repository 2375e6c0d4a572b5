//! Demo front door.
//!
//! A small axum server that turns PIN guesses from a demo web UI into
//! attempt records on the ingestion stream. Ingestion is best-effort: a
//! delivery failure is logged and the HTTP response still carries the
//! guess result, so the demo keeps working through transient outages.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use chrono::Utc;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::Result;
use crate::outputs::OutputSink;
use crate::schema::AttemptRecord;

pub const ENV_SECRET_PIN: &str = "LOGSYNTH_SECRET_PIN";
pub const DEFAULT_SECRET_PIN: &str = "1337";
pub const ATTEMPT_STREAM: &str = "Custom-BruteForceDemo_CL";

const MAX_NICKNAME_LEN: usize = 50;
const MAX_USER_AGENT_LEN: usize = 256;

pub struct ServerState {
    secret_pin: String,
    sink: Mutex<Box<dyn OutputSink>>,
}

impl ServerState {
    pub fn new(secret_pin: String, sink: Box<dyn OutputSink>) -> Self {
        Self {
            secret_pin,
            sink: Mutex::new(sink),
        }
    }
}

/// Secret PIN from the environment, demo default otherwise.
pub fn secret_pin_from_env() -> String {
    std::env::var(ENV_SECRET_PIN)
        .ok()
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_SECRET_PIN.to_string())
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/attempt", post(handle_attempt).options(handle_preflight))
        .with_state(state)
}

pub async fn serve(state: Arc<ServerState>, host: &str, port: u16) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "front door listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

#[derive(Debug)]
struct ValidatedAttempt {
    nickname: String,
    pincode: String,
}

/// Parse and validate the request body. Error values are the client-facing
/// messages.
fn validate_attempt(raw_body: &str) -> std::result::Result<ValidatedAttempt, &'static str> {
    let body: serde_json::Value =
        serde_json::from_str(raw_body).map_err(|_| "Invalid JSON body")?;
    let field = |name: &str| {
        body.get(name)
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string()
    };
    let nickname = field("nickname");
    let pincode = field("pincode");
    if nickname.is_empty() || pincode.is_empty() {
        return Err("nickname and pincode are required");
    }
    if pincode.len() != 4 || !pincode.chars().all(|c| c.is_ascii_digit()) {
        return Err("pincode must be exactly 4 digits");
    }
    Ok(ValidatedAttempt { nickname, pincode })
}

fn source_ip(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }
    headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}

fn truncated(value: &str, max: usize) -> String {
    value.chars().take(max).collect()
}

fn build_record(attempt: &ValidatedAttempt, result: &str, headers: &HeaderMap) -> AttemptRecord {
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    AttemptRecord {
        time_generated: Utc::now(),
        nickname: truncated(&attempt.nickname, MAX_NICKNAME_LEN),
        pincode: attempt.pincode.clone(),
        attempt_result: result.to_string(),
        source_ip: source_ip(headers),
        user_agent: truncated(user_agent, MAX_USER_AGENT_LEN),
    }
}

fn cors_json(status: StatusCode, body: serde_json::Value) -> Response {
    (
        status,
        [(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")],
        axum::Json(body),
    )
        .into_response()
}

async fn handle_attempt(
    State(state): State<Arc<ServerState>>,
    headers: HeaderMap,
    raw_body: String,
) -> Response {
    let attempt = match validate_attempt(&raw_body) {
        Ok(attempt) => attempt,
        Err(message) => {
            return cors_json(StatusCode::BAD_REQUEST, json!({ "error": message }));
        }
    };

    let result = if attempt.pincode == state.secret_pin {
        "Success"
    } else {
        "Failure"
    };
    let record = build_record(&attempt, result, &headers);

    match serde_json::to_value(&record) {
        Ok(value) => {
            let mut sink = state.sink.lock().await;
            if let Err(e) = sink.send(&[value], ATTEMPT_STREAM).await {
                error!(error = %e, "failed to deliver attempt record");
            } else {
                info!(nickname = %record.nickname, result, "logged attempt");
            }
        }
        Err(e) => error!(error = %e, "failed to serialize attempt record"),
    }

    cors_json(
        StatusCode::OK,
        json!({ "result": result, "nickname": attempt.nickname }),
    )
}

async fn handle_preflight() -> Response {
    (
        StatusCode::NO_CONTENT,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
            (header::ACCESS_CONTROL_ALLOW_METHODS, "POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
        .into_response()
}

//! Fibonacci request handler.
//!
//! Per request: count it, find `n`, parse and range-check it, generate on the
//! blocking pool, render `"0, 1, 1, 2"`, then record errors and latency.

use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use fibserve_core::error::{FibServeError, Result};
use fibserve_core::sequence::{Sequence, SequenceRequest};

use crate::app_state::AppState;

const INTERNAL_BODY: &str = "Internal server error";

pub async fn get_fibs(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let started = Instant::now();
    let metrics = state.metrics();
    metrics.requests.inc(&[]);
    tracing::info!(path = %uri, "received GET request");

    let (status, body) = match compute(&params).await {
        Ok(seq) => {
            let body = seq.to_string();
            tracing::info!(path = %uri, len = seq.len(), bytes = body.len(), "response sent");
            (StatusCode::OK, body)
        }
        Err(e) => {
            let code = e.code();
            if code.is_client_error() {
                tracing::warn!(path = %uri, code = code.as_str(), error = ?e, "rejected request");
            } else {
                tracing::error!(path = %uri, code = code.as_str(), error = %e, "error generating fibonacci sequence");
            }
            metrics.request_errors.inc(&[("reason", code.as_str())]);
            (status_for(&e), error_body(&e))
        }
    };

    metrics
        .request_latency
        .observe(&[("status", status.as_str())], started.elapsed());

    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

async fn compute(params: &[(String, String)]) -> Result<Sequence> {
    let raw = query_param(params, "n").ok_or(FibServeError::MissingParameter)?;
    let req = SequenceRequest::parse(raw)?;
    tracing::info!(n = req.count(), "parsed n");

    let seq = tokio::task::spawn_blocking(move || req.generate())
        .await
        .map_err(|e| FibServeError::Internal(format!("sequence generation task failed: {e}")))?;
    tracing::info!(len = seq.len(), "generated fibonacci sequence");
    Ok(seq)
}

/// First non-blank value for `key`. Blank values count as absent.
fn query_param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, v)| k == key && !v.is_empty())
        .map(|(_, v)| v.as_str())
}

fn status_for(err: &FibServeError) -> StatusCode {
    if err.code().is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_body(err: &FibServeError) -> String {
    if err.code().is_client_error() {
        err.to_string()
    } else {
        INTERNAL_BODY.to_string()
    }
}

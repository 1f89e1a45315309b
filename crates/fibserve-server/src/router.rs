//! Axum router wiring for both listeners.
//!
//! The main router has explicit ops routes; every other GET falls through to
//! [`dispatch`], which sends any path starting with `/metrics` to the metrics
//! exposition and everything else to the Fibonacci handler. The metrics
//! router answers every path with the exposition.

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};

use crate::{api, app_state::AppState, ops};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .fallback(dispatch)
        .with_state(state)
}

pub fn build_metrics_router(state: AppState) -> Router {
    Router::new().fallback(ops::metrics).with_state(state)
}

/// Path-prefix routing for the main listener.
async fn dispatch(
    state: State<AppState>,
    method: Method,
    uri: Uri,
    query: Query<Vec<(String, String)>>,
) -> Response {
    if method != Method::GET {
        return (StatusCode::METHOD_NOT_ALLOWED, [(axum::http::header::ALLOW, "GET")]).into_response();
    }
    if uri.path().starts_with("/metrics") {
        return ops::metrics(state).await;
    }
    api::fib::get_fibs(state, uri, query).await
}

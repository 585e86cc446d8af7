use axum::http::header;
use axum::{Json, response::IntoResponse};
use nexus_derive::api_handler;
use nexus_domain::constants::SYSTEM_TAG;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Instant;
use utoipa::ToSchema;

/// Liveness report.
#[derive(Debug, Serialize, ToSchema)]
pub(super) struct HealthResponse {
    status: &'static str,
    version: &'static str,
    /// Seconds since the first request touched the clock.
    uptime: u64,
}

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Server is up", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: "up",
        version: env!("CARGO_PKG_VERSION"),
        uptime: START_TIME.elapsed().as_secs(),
    };

    ([(header::CACHE_CONTROL, "no-store")], Json(body))
}

/// Starts the uptime clock; called once when the router is built.
pub(super) fn start_clock() {
    LazyLock::force(&START_TIME);
}

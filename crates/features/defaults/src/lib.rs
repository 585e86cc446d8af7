//! Defaults slice: named type definitions ("defaults") over HTTP.
//!
//! A definition is opaque JSON. When it carries a `model` object, the components slice
//! uses it as the starting model of new components of that type.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path as RouteParam, State};
use axum::http::StatusCode;
use nexus_derive::api_handler;
use nexus_domain::constants::DEFAULTS_TAG;
use nexus_kernel::server::{ApiError, ApiState, ErrorBody};
use serde_json::Value;
use tracing::info;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[must_use]
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new().routes(routes!(get_definition, put_definition))
}

#[api_handler(
    get,
    path = "/defaults/{type_name}",
    params(("type_name" = String, Path, description = "Type name")),
    responses(
        (status = OK, description = "Stored definition", body = serde_json::Value),
        (status = NOT_FOUND, description = "No definition for this type", body = ErrorBody),
    ),
    tag = DEFAULTS_TAG,
)]
async fn get_definition(
    State(state): State<ApiState>,
    RouteParam(type_name): RouteParam<String>,
) -> Result<Json<Value>, ApiError> {
    state.defaults.get(&type_name).map(Json).ok_or_else(|| ApiError::NotFound {
        message: format!("no definition for type '{type_name}'").into(),
        context: None,
    })
}

/// The body is taken as raw bytes so that a missing `Content-Type` is still accepted.
#[api_handler(
    put,
    path = "/defaults/{type_name}",
    params(("type_name" = String, Path, description = "Type name")),
    request_body(content = serde_json::Value, content_type = "application/json"),
    responses(
        (status = OK, description = "Definition stored"),
        (status = BAD_REQUEST, description = "Body is not JSON", body = ErrorBody),
    ),
    tag = DEFAULTS_TAG,
)]
async fn put_definition(
    State(state): State<ApiState>,
    RouteParam(type_name): RouteParam<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let definition: Value = serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest {
        message: e.to_string().into(),
        context: Some(format!("definition of '{type_name}'").into()),
    })?;

    let replaced = state.defaults.set(type_name.as_str(), definition).is_some();
    info!(type_name = %type_name, replaced, "Type definition stored");
    Ok(StatusCode::OK)
}

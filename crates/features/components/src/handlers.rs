use crate::models::{ComponentSummary, ComponentView, ConstructRequest};
use axum::Json;
use axum::extract::{Path as RouteParam, State};
use axum::http::StatusCode;
use nexus_derive::api_handler;
use nexus_domain::constants::COMPONENTS_TAG;
use nexus_kernel::server::{ApiError, ApiState, ErrorBody};
use nexus_tree::Path;
use tracing::debug;

#[api_handler(
    get,
    path = "/components",
    responses((status = OK, description = "Live components, ancestors first", body = Vec<ComponentSummary>)),
    tag = COMPONENTS_TAG,
)]
pub(crate) async fn list_components(State(state): State<ApiState>) -> Json<Vec<ComponentSummary>> {
    let summaries = state
        .registry
        .components()
        .iter()
        .map(|component| ComponentSummary {
            path: component.path().render(),
            type_name: component.type_name().to_owned(),
        })
        .collect();
    Json(summaries)
}

#[api_handler(
    post,
    path = "/components/{path}",
    params(("path" = String, Path, description = "Dot-delimited component path")),
    request_body = ConstructRequest,
    responses(
        (status = OK, description = "Component constructed"),
        (status = BAD_REQUEST, description = "Malformed path", body = ErrorBody),
        (status = NOT_FOUND, description = "Parent component missing", body = ErrorBody),
        (status = CONFLICT, description = "Path already occupied", body = ErrorBody),
    ),
    tag = COMPONENTS_TAG,
)]
pub(crate) async fn construct_component(
    State(state): State<ApiState>,
    RouteParam(raw): RouteParam<String>,
    Json(request): Json<ConstructRequest>,
) -> Result<StatusCode, ApiError> {
    let path = Path::parse(&raw)?;
    let ConstructRequest { type_name, model } = request;

    let model = state.defaults.initial_model(&type_name, model);
    debug!(path = %path, type_name = %type_name, "Constructing component");
    state.registry.construct(path, type_name, model)?;

    Ok(StatusCode::OK)
}

#[api_handler(
    get,
    path = "/components/{path}",
    params(("path" = String, Path, description = "Dot-delimited component path")),
    responses(
        (status = OK, description = "Component found", body = ComponentView),
        (status = BAD_REQUEST, description = "Malformed path", body = ErrorBody),
        (status = NOT_FOUND, description = "No such component", body = ErrorBody),
    ),
    tag = COMPONENTS_TAG,
)]
pub(crate) async fn lookup_component(
    State(state): State<ApiState>,
    RouteParam(raw): RouteParam<String>,
) -> Result<Json<ComponentView>, ApiError> {
    let path = Path::parse(&raw)?;
    let component = state.registry.lookup(&path)?;
    Ok(Json(ComponentView::from(component.as_ref())))
}

#[api_handler(
    delete,
    path = "/components/{path}",
    params(("path" = String, Path, description = "Dot-delimited component path")),
    responses(
        (status = OK, description = "Component and its subtree destroyed"),
        (status = BAD_REQUEST, description = "Malformed path", body = ErrorBody),
        (status = NOT_FOUND, description = "No such component", body = ErrorBody),
    ),
    tag = COMPONENTS_TAG,
)]
pub(crate) async fn destroy_component(
    State(state): State<ApiState>,
    RouteParam(raw): RouteParam<String>,
) -> Result<StatusCode, ApiError> {
    let path = Path::parse(&raw)?;
    state.registry.destroy(&path)?;
    Ok(StatusCode::OK)
}

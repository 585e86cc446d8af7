//! Components slice: the HTTP surface of the registry.
//!
//! New components start from the defaults stored for their type, with the caller's model
//! merged on top.

mod handlers;
mod models;

pub use models::{ComponentSummary, ComponentView, ConstructRequest};

use nexus_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[must_use]
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::list_components))
        .routes(routes!(
            handlers::construct_component,
            handlers::lookup_component,
            handlers::destroy_component
        ))
}

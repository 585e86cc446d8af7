//! Binding slice: live two-way synchronization of a region of a component model.
//!
//! A client opens a WebSocket on `/bindModel/{component_path}/{model_path}`. It first
//! receives the current value at the model path, then one text frame with the new value
//! after every change that touches it. Text frames sent by the client are change messages
//! (`{"path", "value", "type"}`) relative to the bound model path.

mod error;
mod message;
mod server;
mod session;

pub use error::{BindingError, BindingErrorExt};
pub use message::ChangeMessage;
pub use session::{BindingSession, Outbound, SessionState};

use nexus_kernel::server::ApiState;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

#[must_use]
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(server::bind_model))
        .routes(routes!(server::bind_whole_model))
}

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use nexus_tree::TreeError;
use serde::Serialize;
use std::borrow::Cow;
use tracing::{debug, error};
use utoipa::ToSchema;

/// Failure body returned by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Always `true`.
    pub is_error: bool,
    pub message: String,
}

/// Errors surfaced to HTTP clients.
#[nexus_derive::nexus_error]
pub enum ApiError {
    #[error("{source}{}", format_context(.context))]
    Tree { source: TreeError, context: Option<Cow<'static, str>> },

    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Bad request{}: {message}", format_context(.context))]
    BadRequest { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Tree { source, .. } => match source {
                TreeError::MalformedPath { .. } | TreeError::InvalidChangeType { .. } => {
                    StatusCode::BAD_REQUEST
                },
                TreeError::ParentNotFound { .. } | TreeError::NotFound { .. } => {
                    StatusCode::NOT_FOUND
                },
                TreeError::PathConflict { .. } => StatusCode::CONFLICT,
            },
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            debug!(kind = self.kind(), status = status.as_u16(), error = %self, "Request rejected");
        }

        (status, Json(ErrorBody { is_error: true, message: self.to_string() })).into_response()
    }
}

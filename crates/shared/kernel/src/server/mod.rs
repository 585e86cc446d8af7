//! Shared HTTP plumbing for the feature slices.

mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ApiErrorExt, ErrorBody};
pub use state::{ApiState, ApiStateBuilder, ApiStateError, ApiStateErrorExt, ApiStateInner};

use std::borrow::Cow;

/// Errors that can occur during event bus operations.
#[nexus_derive::nexus_error]
pub enum EventBusError {
    /// An internal dynamic cast failed; the channel registry holds a foreign sender.
    #[error("Type mismatch{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Capacity must be greater than zero.
    #[error("Invalid capacity{}: {message}", format_context(.context))]
    InvalidCapacity { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

use nexus_tree::TreeError;
use std::borrow::Cow;

/// Failures of a binding session; none of them unbinds the session by itself.
#[nexus_derive::nexus_error]
pub enum BindingError {
    #[error("{source}{}", format_context(.context))]
    Tree { source: TreeError, context: Option<Cow<'static, str>> },

    /// An inbound frame is not a change message.
    #[error("Malformed message{}: {source}", format_context(.context))]
    Message { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// The session no longer accepts messages.
    #[error("Session closed{}: {message}", format_context(.context))]
    Closed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

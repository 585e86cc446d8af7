use std::borrow::Cow;

/// Failures of registry, path and change-request operations.
///
/// All of them are local to the requesting operation; none poisons shared state.
#[nexus_derive::nexus_error]
pub enum TreeError {
    /// The string form of a path could not be parsed.
    #[error("Malformed path{}: {message}", format_context(.context))]
    MalformedPath { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The parent of a component being constructed does not exist.
    #[error("Parent not found{}: {message}", format_context(.context))]
    ParentNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A component already occupies the path.
    #[error("Path conflict{}: {message}", format_context(.context))]
    PathConflict { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// No component exists at the path.
    #[error("Component not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The change type is neither `SET` nor `DELETE`.
    #[error("Invalid change type{}: {message}", format_context(.context))]
    InvalidChangeType { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

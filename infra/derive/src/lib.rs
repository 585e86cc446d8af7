#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Nexus workspace: error enums, `OpenAPI`-aware
//! handlers and the runtime bootstrap attribute.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! nexus-derive.workspace = true
//! ```
//!
//! The doc examples are `ignore`d because a proc-macro crate cannot use its own macros.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, parse_macro_input};

/// Bootstraps a tuned Tokio runtime around an `async fn main`.
///
/// # Arguments
///
/// * `high_performance` - Server profile (bigger stacks, long keep-alive).
/// * `memory_efficient` - Half the workers, smaller stacks.
/// * `default` - Worker threads detected from available parallelism.
///
/// # Examples
///
/// ```rust,ignore
/// #[nexus_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Marks an Axum handler for `OpenAPI` documentation.
///
/// Accepts the regular `utoipa::path` arguments. The `utoipa::path` attribute is only
/// emitted when the consuming crate enables its `server` feature.
///
/// ```rust,ignore
/// #[nexus_derive::api_handler(get, path = "/health", tag = "System")]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns an enum into a domain error type.
///
/// # Generated Items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already derived.
/// * `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant holding a `source` field.
/// * `From<Source>` for those variants.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * `Name::kind()` returning the variant name, for structured logging.
///
/// # Requirements
///
/// Every variant uses named fields. Variants with a `source` need a
/// `context: Option<Cow<'static, str>>` field.
///
/// ```rust,ignore
/// #[nexus_derive::nexus_error]
/// pub enum StoreError {
///     #[error("Not found{}: {message}", format_context(.context))]
///     NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn nexus_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

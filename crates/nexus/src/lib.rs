//! Facade crate for Nexus features and shared modules.
//! Re-exports domain/kernel/tree primitives and aggregates the feature slices.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Add `nexus` (the `server` feature is on by default).
//! - Mount [`server::api_router`] with an [`kernel::server::ApiState`].

pub use nexus_domain as domain;
pub use nexus_event_bus as events;
pub use nexus_kernel as kernel;
pub use nexus_tree as tree;

#[cfg(feature = "server")]
pub mod server {
    use nexus_kernel::server::ApiState;
    use utoipa_axum::router::OpenApiRouter;

    pub mod router {
        pub use nexus_kernel::server::router::system_router;
    }

    /// Every slice's routes plus `/health`, not yet bound to a state.
    #[must_use]
    pub fn api_router() -> OpenApiRouter<ApiState> {
        router::system_router()
            .merge(crate::features::components::router())
            .merge(crate::features::defaults::router())
            .merge(crate::features::binding::router())
    }
}

/// Feature registry for runtime introspection.
#[cfg(feature = "server")]
pub mod features {
    pub use nexus_binding as binding;
    pub use nexus_components as components;
    pub use nexus_defaults as defaults;

    /// Slices mounted by [`crate::server::api_router`].
    pub const ENABLED: &[&str] = &["components", "defaults", "binding"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

//! Names shared between routers, `OpenAPI` documents and log fields.

/// `OpenAPI` tag of the health endpoint.
pub const SYSTEM_TAG: &str = "System";
pub const COMPONENTS_TAG: &str = "Components";
pub const DEFAULTS_TAG: &str = "Defaults";
pub const BINDING_TAG: &str = "Binding";

/// Environment variable prefix for configuration overrides (`NEXUS__SERVER__PORT`).
pub const ENV_PREFIX: &str = "NEXUS";
/// Configuration file looked up when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "server";
pub const DEFAULT_PORT: u16 = 9081;

use config::{Config, Environment, File};
use nexus_domain::constants::{DEFAULT_CONFIG_FILE, ENV_PREFIX};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

#[nexus_derive::nexus_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads layered configuration: a file, then `NEXUS__`-prefixed environment variables.
///
/// * An explicit `path` must exist. Without one, a `server` file (any extension the
///   `config` crate understands) in the working directory is used if present, so a bare
///   environment is enough to start.
/// * Nested keys use a double underscore: `NEXUS__SERVER__PORT=9090` sets `server.port`.
///
/// # Errors
/// Returns [`ConfigError::Config`] if an explicit file is missing, a source cannot be read,
/// or the merged values do not fit `T`.
///
/// # Example
/// ```rust
/// use nexus_kernel::config::load_config;
///
/// #[derive(Default, serde::Deserialize)]
/// struct AppConfig {
///     port: u16,
/// }
///
/// let config: AppConfig = load_config(Some("config/local")).unwrap_or_default();
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let (file, required) = path.map_or_else(
        || (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        |p| (p.as_ref().to_path_buf(), true),
    );

    info!(file = %file.display(), required, "Loading configuration");

    Config::builder()
        .add_source(File::from(file.as_path()).required(required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("building configuration sources")?
        .try_deserialize::<T>()
        .context("deserializing configuration")
}

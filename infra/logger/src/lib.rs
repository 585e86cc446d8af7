//! # Logger
//!
//! Installs the global `tracing` subscriber for a Nexus process: a compact console layer,
//! an optional rolling file layer (plain text or JSON) written through a non-blocking
//! worker, and an `EnvFilter` that honours `RUST_LOG`.
//!
//! The builder is typed: a name is required before [`LoggerBuilder::init`] exists, and the
//! file-only options (`rotation`, `max_files`, `json`) appear only after a log directory
//! has been set.
//!
//! ```rust
//! use nexus_logger::{LevelFilter, Logger};
//!
//! let _logger = Logger::builder()
//!     .name("nexus-doc")
//!     .level(LevelFilter::DEBUG)
//!     .env_filter("nexus_tree=trace")
//!     .init()
//!     .unwrap();
//! ```

mod error;

pub use crate::error::{LoggerError, LoggerErrorExt};
pub use tracing::level_filters::LevelFilter;
pub use tracing_appender::rolling::Rotation;

use sealed::State;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::RollingFileAppender;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

const DEFAULT_MAX_FILES: usize = 7;
const LOG_FILE_SUFFIX: &str = "log";

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

#[derive(Debug)]
struct Settings {
    console: bool,
    ansi: bool,
    level: LevelFilter,
    directives: Option<String>,
    directory: Option<PathBuf>,
    rotation: Rotation,
    max_files: usize,
    json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            console: true,
            ansi: true,
            level: LevelFilter::INFO,
            directives: None,
            directory: None,
            rotation: Rotation::DAILY,
            max_files: DEFAULT_MAX_FILES,
            json: false,
        }
    }
}

#[derive(Debug)]
pub struct Unnamed;
#[derive(Debug)]
pub struct Named(String);
#[derive(Debug)]
pub struct ConsoleOnly;
#[derive(Debug)]
pub struct WithFile;

mod sealed {
    pub trait State {}
}
impl State for Unnamed {}
impl State for Named {}
impl State for ConsoleOnly {}
impl State for WithFile {}

/// Configures the global subscriber. Obtained from [`Logger::builder`].
#[derive(Debug)]
pub struct LoggerBuilder<N: State = Unnamed, F: State = ConsoleOnly> {
    settings: Settings,
    name: N,
    output: PhantomData<F>,
}

impl<F: State> LoggerBuilder<Unnamed, F> {
    /// Names the process; also the prefix of rolled log files (`<name>.<date>.log`).
    pub fn name(self, name: impl Into<String>) -> LoggerBuilder<Named, F> {
        LoggerBuilder { settings: self.settings, name: Named(name.into()), output: PhantomData }
    }
}

impl<F: State> LoggerBuilder<Named, F> {
    #[must_use]
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.settings.level = level;
        self
    }

    /// Extra filter directives such as `nexus_binding=debug,tower_http=warn`.
    ///
    /// Without directives the filter is read from `RUST_LOG`.
    #[must_use]
    pub fn env_filter(mut self, directives: impl Into<String>) -> Self {
        self.settings.directives = Some(directives.into());
        self
    }

    #[must_use]
    pub const fn console(mut self, enabled: bool) -> Self {
        self.settings.console = enabled;
        self
    }

    /// Colored console output; on by default.
    #[must_use]
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.settings.ansi = enabled;
        self
    }

    /// Also writes rolling log files into `directory`, creating it if needed.
    pub fn path(self, directory: impl Into<PathBuf>) -> LoggerBuilder<Named, WithFile> {
        let mut settings = self.settings;
        settings.directory = Some(directory.into());
        LoggerBuilder { settings, name: self.name, output: PhantomData }
    }

    /// Installs the subscriber.
    ///
    /// Keep the returned [`Logger`] alive for the lifetime of the process; dropping it
    /// stops the file writer.
    ///
    /// # Errors
    /// * [`LoggerError::InvalidConfiguration`] for an empty name, zero `max_files`, bad
    ///   filter directives, or when no output is enabled.
    /// * [`LoggerError::Io`] / [`LoggerError::Appender`] if the log directory is unusable.
    /// * [`LoggerError::Subscriber`] if a global subscriber is already installed.
    pub fn init(self) -> Result<Logger, LoggerError> {
        let Self { settings, name: Named(name), .. } = self;
        validate(&settings, &name)?;
        let filter = env_filter(&settings)?;

        let mut layers: Vec<BoxedLayer> = Vec::new();
        if settings.console {
            layers.push(fmt::layer().compact().with_ansi(settings.ansi).boxed());
        }

        let guard = match &settings.directory {
            Some(directory) => {
                let (layer, guard) = file_layer(&settings, directory, &name)?;
                layers.push(layer);
                Some(guard)
            },
            None => None,
        };

        if layers.is_empty() {
            return Err(LoggerError::InvalidConfiguration {
                message: "no output enabled; enable the console or set a log directory".into(),
                context: None,
            });
        }

        tracing_subscriber::registry().with(layers).with(filter).try_init()?;
        tracing::debug!(logger = %name, file = guard.is_some(), "Logging initialized");

        Ok(Logger { guard })
    }
}

impl LoggerBuilder<Named, WithFile> {
    #[must_use]
    pub const fn rotation(mut self, rotation: Rotation) -> Self {
        self.settings.rotation = rotation;
        self
    }

    /// Number of rolled files kept on disk.
    #[must_use]
    pub const fn max_files(mut self, max: usize) -> Self {
        self.settings.max_files = max;
        self
    }

    /// Writes the file output as JSON lines; the console stays human-readable.
    #[must_use]
    pub const fn json(mut self, enabled: bool) -> Self {
        self.settings.json = enabled;
        self
    }
}

/// Handle to the installed subscriber.
#[must_use = "dropping the logger stops the background file writer"]
#[derive(Debug)]
pub struct Logger {
    guard: Option<WorkerGuard>,
}

impl Logger {
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder { settings: Settings::default(), name: Unnamed, output: PhantomData }
    }

    /// True when a file writer is attached.
    #[must_use]
    pub const fn has_file_output(&self) -> bool {
        self.guard.is_some()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if self.guard.is_some() {
            tracing::info!("Flushing log files");
        }
    }
}

fn validate(settings: &Settings, name: &str) -> Result<(), LoggerError> {
    if name.trim().is_empty() {
        return Err(LoggerError::InvalidConfiguration {
            message: "logger name must not be empty".into(),
            context: None,
        });
    }
    if settings.max_files == 0 {
        return Err(LoggerError::InvalidConfiguration {
            message: "max_files must be at least 1".into(),
            context: Some(name.to_owned().into()),
        });
    }
    Ok(())
}

fn env_filter(settings: &Settings) -> Result<EnvFilter, LoggerError> {
    let builder = EnvFilter::builder().with_default_directive(settings.level.into());
    match &settings.directives {
        Some(directives) => {
            builder.parse(directives).map_err(|e| LoggerError::InvalidConfiguration {
                message: e.to_string().into(),
                context: Some(format!("filter '{directives}'").into()),
            })
        },
        None => Ok(builder.from_env_lossy()),
    }
}

fn file_layer(
    settings: &Settings,
    directory: &Path,
    name: &str,
) -> Result<(BoxedLayer, WorkerGuard), LoggerError> {
    std::fs::create_dir_all(directory)
        .context(format!("creating {}", directory.display()))?;

    let appender = RollingFileAppender::builder()
        .rotation(settings.rotation.clone())
        .filename_prefix(name)
        .filename_suffix(LOG_FILE_SUFFIX)
        .max_log_files(settings.max_files)
        .build(directory)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let layer = fmt::layer().with_writer(writer).with_ansi(false);
    let layer = if settings.json { layer.json().boxed() } else { layer.boxed() };
    Ok((layer, guard))
}

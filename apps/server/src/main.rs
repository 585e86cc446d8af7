use anyhow::Context;
use nexus::domain::config::{ApiConfig, LogConfig};
use nexus::kernel::config::load_config;
use nexus_logger::{LevelFilter, Logger};
use nexus_server::Server;

#[nexus_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    // An explicit config file may be given as the only argument.
    let cfg: ApiConfig =
        load_config(std::env::args().nth(1)).context("Critical: Configuration is malformed")?;

    let _log = init_logger(&cfg.log)?;

    Server::builder().config(cfg).build()?.run().await
}

fn init_logger(log: &LogConfig) -> anyhow::Result<Logger> {
    let level: LevelFilter =
        log.level.parse().with_context(|| format!("Invalid log level '{}'", log.level))?;

    let mut builder = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    if let Some(filter) = &log.filter {
        builder = builder.env_filter(filter.clone());
    }

    let logger = match &log.directory {
        Some(directory) => builder.path(directory).json(log.json).init(),
        None => builder.init(),
    };
    logger.context("Failed to initialize logging")
}

// src/core/logging.rs
use crate::config::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `RUST_LOG` wins over the configured level.
///
/// When the terminal UI owns stdout, logs go to a daily file under
/// `logging.directory`; keep the returned guard alive until exit or the
/// buffered lines are lost.
pub fn init(config: &LoggingConfig, to_file: bool) -> anyhow::Result<Option<WorkerGuard>> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    if to_file {
        std::fs::create_dir_all(&config.directory)?;
        let appender = tracing_appender::rolling::daily(&config.directory, "swappa_watch.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(writer)
            .with_ansi(false)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(Some(guard))
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(None)
    }
}

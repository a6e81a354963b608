use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_appender::rolling::{self, RollingFileAppender};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "warn,backup_monitor=info";
const DEFAULT_LOG_DIR: &str = "./logs";
const LOG_FILE_PREFIX: &str = "backup-monitor.log";

/// Where and how much to log, read from `TRACING_LEVEL`, `LOG_DIR` and
/// `LOG_ROTATION` (`daily` or `never`).
#[derive(Debug, Clone, PartialEq, Eq)]
struct LogSettings {
    filter: String,
    dir: PathBuf,
    daily: bool,
}

impl LogSettings {
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        LogSettings {
            filter: non_blank("TRACING_LEVEL").unwrap_or_else(|| DEFAULT_FILTER.to_string()),
            dir: non_blank("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            daily: non_blank("LOG_ROTATION")
                .map(|v| !v.trim().eq_ignore_ascii_case("never"))
                .unwrap_or(true),
        }
    }

    fn appender(&self) -> RollingFileAppender {
        if self.daily {
            rolling::daily(&self.dir, LOG_FILE_PREFIX)
        } else {
            rolling::never(&self.dir, LOG_FILE_PREFIX)
        }
    }
}

/// Console output goes to stderr so `check` output on stdout stays clean.
/// The returned guard flushes the file writer when dropped.
pub fn init_logger() -> impl Drop {
    let settings = LogSettings::from_lookup(|key| env::var(key).ok());
    let filter_layer = EnvFilter::new(&settings.filter);

    let (non_blocking, guard) = tracing_appender::non_blocking(settings.appender());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .compact()
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_thread_ids(true)
                .with_ansi(false),
        )
        .with(filter_layer)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_dir = %settings.dir.display(),
        rotation = if settings.daily { "daily" } else { "never" },
        "backup-monitor logging started"
    );

    guard
}

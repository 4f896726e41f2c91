//! Tracing setup for simulation runs
//!
//! Rollouts and environment resets emit `tracing` events under the `cat_sim` target.
//! Nothing is printed until a binary, bench or test calls [`init_tracing`] (or
//! [`init_tracing_from_env`]).
//!
//! Environment variables:
//! - `RUST_LOG`: filter directive, default [`DEFAULT_LOG_LEVEL`]
//! - `ENABLE_FILE_LOGS`: `true`/`1` adds a daily rolling file under `LOG_DIR` (default `./logs`)
//!
//! ```no_run
//! // keep the guard alive for the whole run, otherwise buffered file lines are lost
//! let _guard = cat_sim::logging::init_tracing_from_env();
//! tracing::info!(episodes = 100, "starting evaluation");
//! ```

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable
pub const DEFAULT_LOG_LEVEL: &str = "info";

const LOG_FILE_PREFIX: &str = "cat-sim.log";

/// Flushes the non-blocking file writer when dropped.
pub struct FileLogGuard {
    _guard: WorkerGuard,
}

pub fn file_logging_enabled() -> bool {
    file_logging_enabled_from(|key| std::env::var(key).ok())
}

pub fn log_level_from_env() -> String {
    log_level_from(|key| std::env::var(key).ok())
}

fn file_logging_enabled_from<F>(lookup: F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup("ENABLE_FILE_LOGS")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

fn log_level_from<F>(lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup("RUST_LOG")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
}

fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL))
}

/// [`init_tracing`] with the level taken from `RUST_LOG`.
pub fn init_tracing_from_env() -> Option<FileLogGuard> {
    init_tracing(&log_level_from_env())
}

/// Install the global subscriber. A second call in the same process is a no-op.
pub fn init_tracing(log_level: &str) -> Option<FileLogGuard> {
    let env_filter = build_filter(log_level);
    let stdout_layer = fmt::layer().with_target(true);

    if file_logging_enabled() {
        let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
        match std::fs::create_dir_all(&log_dir) {
            Ok(()) => {
                let file_appender =
                    RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX);
                let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
                let file_layer = fmt::layer()
                    .with_writer(file_writer)
                    .with_ansi(false)
                    .with_target(true);

                let installed = tracing_subscriber::registry()
                    .with(env_filter)
                    .with(stdout_layer)
                    .with(file_layer)
                    .try_init()
                    .is_ok();

                return installed.then_some(FileLogGuard { _guard: guard });
            }
            // no subscriber exists yet, so stderr is the only place this can go
            Err(err) => eprintln!("cat-sim: cannot create log directory {log_dir}: {err}"),
        }
    }

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .try_init();

    None
}

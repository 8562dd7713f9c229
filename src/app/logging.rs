//! Usage: Process-wide tracing setup (stderr + daily rolling file under the app data dir).

use std::path::Path;
use std::sync::OnceLock;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

pub const LOG_FILE_NAME: &str = "gmx-desktop.log";
const DEFAULT_FILTER: &str = "info";

static FILE_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Safe to call more than once; only the first call installs the subscriber.
pub fn init(log_dir: &Path) {
    if FILE_GUARD.get().is_some() {
        return;
    }

    if let Err(err) = std::fs::create_dir_all(log_dir) {
        eprintln!("failed to create log dir {}: {err}", log_dir.display());
        init_stderr_only();
        return;
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_NAME);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
    if FILE_GUARD.set(guard).is_err() {
        return;
    }

    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(file_writer),
        );
    let _ = tracing_log::LogTracer::init();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        tracing::info!(log_dir = %log_dir.display(), "日志初始化完成");
    }
}

fn init_stderr_only() {
    let subscriber = tracing_subscriber::registry()
        .with(env_filter())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));
    let _ = tracing_log::LogTracer::init();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

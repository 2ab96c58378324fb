use tracing::Subscriber;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Stderr-only subscriber for the window before config is loaded, so
/// config diagnostics are not lost. Install with `set_default`.
pub fn startup_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer().with_writer(writer))
}

/// Console logging, plus a daily rolling file under `log_dir` when set.
/// The returned guard must outlive the program for file output to flush.
pub fn init_tracing(log_dir: Option<&str>) -> Option<WorkerGuard> {
    let registry = tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt::layer());

    match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "doorguard-backend.log");
            let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
            registry
                .with(fmt::layer().with_ansi(false).with_writer(file_writer))
                .init();
            Some(guard)
        }
        None => {
            registry.init();
            None
        }
    }
}

//! Telemetry setup

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LogSettings;
use crate::error::AppError;

/// Installs the global JSON subscriber. The returned guard must be held for
/// the lifetime of the process when file logging is enabled.
pub fn init_telemetry(settings: &LogSettings) -> Result<Option<WorkerGuard>, AppError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match settings.directory.as_deref() {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "control-plane.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().json().with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().json())
        .with(file_layer)
        .try_init()
        .map_err(|e| AppError::TelemetryError(e.to_string()))?;

    Ok(guard)
}

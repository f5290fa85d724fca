//! Measurement envelope and tracing bootstrap.
//!
//! Every hook invocation and every domain call produces one [`Measurement`].
//! Measurements go to a [`MetricsSink`]; the default [`MetricsFacade`]
//! forwards them to the `metrics` crate so the host process can install
//! whatever exporter it wants.

use std::fmt;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use crate::service::config::{LogConfig, LogFormat};

/// Counter incremented once per measurement.
pub const API_COUNT: &str = "api_count";
/// Histogram of elapsed time per measurement, in microseconds.
pub const API_TIME_SPENT_US: &str = "api_time_spent_us";

/// Which part of a request a measurement covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Before,
    After,
    Call,
}

impl Direction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Before => "before",
            Self::After => "after",
            Self::Call => "call",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One timing sample. The count it contributes is always 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Measurement {
    /// Fully qualified name, e.g. `groupgate.api-before.Groupgate.CreateGroup`.
    pub name: String,
    /// Bare operation name, e.g. `CreateGroup`.
    pub operation: &'static str,
    pub direction: Direction,
    pub elapsed_us: u64,
}

impl Measurement {
    #[must_use]
    pub fn new(
        name: String,
        operation: &'static str,
        direction: Direction,
        elapsed: Duration,
    ) -> Self {
        let elapsed_us = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        Self {
            name,
            operation,
            direction,
            elapsed_us,
        }
    }
}

/// Destination for measurements. Must not block and must not fail.
pub trait MetricsSink: Send + Sync {
    fn record(&self, measurement: &Measurement);
}

/// Sink that emits through the global `metrics` recorder.
///
/// Without an installed recorder the calls are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsFacade;

impl MetricsSink for MetricsFacade {
    fn record(&self, measurement: &Measurement) {
        let direction = measurement.direction.as_str();
        #[allow(clippy::cast_precision_loss)]
        let elapsed_us = measurement.elapsed_us as f64;
        metrics::counter!(
            API_COUNT,
            "function" => measurement.name.clone(),
            "direction" => direction
        )
        .increment(1);
        metrics::histogram!(
            API_TIME_SPENT_US,
            "function" => measurement.name.clone(),
            "direction" => direction
        )
        .record(elapsed_us);
    }
}

/// Installs the global `tracing` subscriber described by `config`.
///
/// # Errors
///
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn init_tracing(config: &LogConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}")),
        LogFormat::Text => builder
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}")),
    }
}

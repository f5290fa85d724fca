use std::time::Duration;

use crate::telemetry::Direction;

/// Configuration for the group API pipeline.
///
/// Derives `clap::Args` so a host binary can `#[command(flatten)]` it; every
/// field also reads a `GROUPGATE_*` environment variable.
#[derive(Debug, Clone, clap::Args)]
pub struct ApiConfig {
    /// Leading segment of hook span and metric names.
    #[arg(long = "api-namespace", env = "GROUPGATE_API_NAMESPACE", default_value = "groupgate")]
    pub namespace: String,
    /// Service segment of hook span and metric names.
    #[arg(long = "api-service-name", env = "GROUPGATE_API_SERVICE_NAME", default_value = "Groupgate")]
    pub service_name: String,
    /// Deadline for a single hook invocation in milliseconds. 0 disables it.
    #[arg(long, env = "GROUPGATE_HOOK_TIMEOUT_MS", default_value_t = 0)]
    pub hook_timeout_ms: u64,
    /// Page size used by group listing when the request doesn't set one.
    #[arg(
        long,
        env = "GROUPGATE_LIST_GROUPS_DEFAULT_LIMIT",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub list_groups_default_limit: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            namespace: "groupgate".to_string(),
            service_name: "Groupgate".to_string(),
            hook_timeout_ms: 0,
            list_groups_default_limit: 1,
        }
    }
}

impl ApiConfig {
    /// Hook deadline, if one is configured.
    #[must_use]
    pub fn hook_timeout(&self) -> Option<Duration> {
        (self.hook_timeout_ms > 0).then(|| Duration::from_millis(self.hook_timeout_ms))
    }

    /// Fully qualified span/metric name for one part of an operation:
    /// `<namespace>.api-before.<Service>.<Operation>` for hooks,
    /// `<namespace>.api.<Service>.<Operation>` for the domain call.
    #[must_use]
    pub fn qualified_name(&self, direction: Direction, operation: &str) -> String {
        let segment = match direction {
            Direction::Before => "api-before",
            Direction::After => "api-after",
            Direction::Call => "api",
        };
        format!(
            "{}.{segment}.{}.{operation}",
            self.namespace, self.service_name
        )
    }
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Logging configuration consumed by [`crate::telemetry::init_tracing`].
#[derive(Debug, Clone, clap::Args)]
pub struct LogConfig {
    /// `EnvFilter` directives, e.g. `groupgate_server=debug,info`.
    #[arg(long = "log-filter", env = "GROUPGATE_LOG", default_value = "info")]
    pub filter: String,
    #[arg(long = "log-format", env = "GROUPGATE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

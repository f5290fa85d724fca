//! Network configuration for the HTTP transport.

use std::time::Duration;

/// Bind address, CORS policy and request deadline for the HTTP server.
#[derive(Debug, Clone, clap::Args)]
pub struct NetworkConfig {
    /// Bind address for the server.
    #[arg(long, env = "GROUPGATE_HOST", default_value = "0.0.0.0")]
    pub host: String,
    /// Port to listen on. 0 means OS-assigned.
    #[arg(long, env = "GROUPGATE_PORT", default_value_t = 7350)]
    pub port: u16,
    /// Allowed CORS origins; `*` allows any.
    #[arg(long, env = "GROUPGATE_CORS_ORIGINS", value_delimiter = ',', default_value = "*")]
    pub cors_origins: Vec<String>,
    /// Maximum time to wait for a request to complete, in seconds.
    #[arg(
        long = "request-timeout-secs",
        env = "GROUPGATE_REQUEST_TIMEOUT_SECS",
        value_parser = parse_secs,
        default_value = "30"
    )]
    pub request_timeout: Duration,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7350,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
        }
    }
}

fn parse_secs(raw: &str) -> Result<Duration, String> {
    raw.parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| format!("invalid number of seconds: {e}"))
}

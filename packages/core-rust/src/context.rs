use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Network origin of an inbound request as seen by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientAddress {
    /// Client IP or hostname. Empty when the transport could not determine it.
    pub host: String,
    /// Client port, if the transport exposes one (proxied requests often don't).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub port: Option<u16>,
}

impl ClientAddress {
    #[must_use]
    pub fn new(host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Address of a caller whose origin is not known.
    #[must_use]
    pub fn unknown() -> Self {
        Self {
            host: String::new(),
            port: None,
        }
    }
}

impl fmt::Display for ClientAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) => write!(f, "{}:{port}", self.host),
            None => f.write_str(&self.host),
        }
    }
}

/// Authenticated caller identity attached to a request by the transport layer.
///
/// Established before the API pipeline runs and read-only for the rest of the
/// request. Passed explicitly into every entry point and every hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityContext {
    /// Authenticated user.
    pub user_id: Uuid,
    /// Username bound to the session.
    pub username: String,
    /// Session expiry, epoch seconds.
    pub session_expiry: i64,
    /// Where the request came from.
    pub client_addr: ClientAddress,
}

impl IdentityContext {
    #[must_use]
    pub fn new(
        user_id: Uuid,
        username: impl Into<String>,
        session_expiry: i64,
        client_addr: ClientAddress,
    ) -> Self {
        Self {
            user_id,
            username: username.into(),
            session_expiry,
            client_addr,
        }
    }

    /// Hyphenated textual form of the caller's user ID.
    #[must_use]
    pub fn user_id_string(&self) -> String {
        self.user_id.hyphenated().to_string()
    }
}

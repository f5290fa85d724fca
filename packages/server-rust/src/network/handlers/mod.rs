//! HTTP handler definitions.
//!
//! `AppState` is the shared state carried through axum extractors. Each
//! group handler maps one route onto one [`GroupApi`] entry point.

pub mod extract;
pub mod groups;
pub mod health;

pub use extract::{ApiError, Caller, JsonBody, JsonOrDefault, PathParam, QueryParams};
pub use health::healthcheck_handler;

use std::sync::Arc;
use std::time::Instant;

use crate::service::GroupApi;

/// Shared application state passed to all axum handlers via `State`
/// extraction. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub api: Arc<GroupApi>,
    /// Server process start time, used for uptime reporting.
    pub start_time: Instant,
}

//! HTTP transport for the group API: configuration, middleware, handlers
//! and the server lifecycle.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;

pub use config::NetworkConfig;
pub use handlers::{ApiError, AppState, Caller};
pub use module::NetworkModule;

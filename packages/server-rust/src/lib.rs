//! groupgate server: hook-augmented group API pipeline with an axum
//! transport.
//!
//! Each group operation is validated, offered to an optional before-hook,
//! dispatched to the [`GroupDomain`], translated to a caller-visible
//! status on failure, and finally shown to an optional after-hook.

pub mod hooks;
pub mod network;
pub mod service;
pub mod telemetry;
pub mod traits;

#[cfg(test)]
mod testing;

pub use hooks::{HookRegistry, HookRegistryBuilder};
pub use service::{ApiConfig, GroupApi};
pub use telemetry::{init_tracing, MetricsFacade, MetricsSink};
pub use traits::{DomainError, GroupDomain, PresenceTracker, Sentinel};

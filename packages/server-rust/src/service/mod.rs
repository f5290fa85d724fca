//! Group API request pipeline.
//!
//! 1. **Validation** (`validate`): shared field rules, run before any hook
//! 2. **Descriptors** (`operation`, `ops`): per-operation validator, domain
//!    call and error table
//! 3. **Translation** (`errors`): domain sentinel to caller-visible status
//! 4. **Orchestration** (`api`): the generic pipeline and its entry points

pub mod api;
pub mod config;
pub mod errors;
pub mod operation;
pub mod ops;
pub mod validate;

// Re-export key types for convenient access.
pub use api::GroupApi;
pub use config::{ApiConfig, LogConfig, LogFormat};
pub use errors::{ErrorRule, ErrorTable};
pub use operation::{ApiOperation, DispatchContext};
pub use validate::Validated;

//! Before/after extension hooks around each group API operation.
//!
//! A before-hook sees the request first and may pass it on, replace it, or
//! reject it with a status of its choosing. An after-hook observes the
//! successful response and cannot change it. Hooks are registered at startup
//! in a [`HookRegistry`] and invoked by the pipeline through the
//! instrumented invoker in [`invoke`].

pub mod hook;
pub(crate) mod invoke;
pub mod registry;

pub use hook::{after_fn, before_fn, AfterHook, BeforeHook, BeforeOutcome};
pub use invoke::{BEFORE_HOOK_NO_RESULT, BEFORE_HOOK_TIMED_OUT};
pub use registry::{HookRegistry, HookRegistryBuilder};

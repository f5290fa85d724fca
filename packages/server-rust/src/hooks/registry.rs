//! Typed hook registry.
//!
//! Hooks are registered once at startup through [`HookRegistryBuilder`]. The
//! built [`HookRegistry`] is immutable and shared behind an `Arc`, so the
//! request path reads it without locking.

use std::any::Any;
use std::collections::HashMap;

use crate::hooks::hook::{AfterHook, BeforeHook};
use crate::service::operation::ApiOperation;
use crate::telemetry::Direction;

type Slot = Box<dyn Any + Send + Sync>;

// ---------------------------------------------------------------------------
// HookRegistry
// ---------------------------------------------------------------------------

/// Immutable set of before/after hooks keyed by operation name.
///
/// Each slot holds a `Box<dyn BeforeHook<O::Request>>` (or the after-hook
/// equivalent) erased to `Any`; typed lookup downcasts it back using the
/// operation descriptor, so a hook can only ever see its own request type.
#[derive(Default)]
pub struct HookRegistry {
    before: HashMap<&'static str, Slot>,
    after: HashMap<&'static str, Slot>,
}

impl HookRegistry {
    #[must_use]
    pub fn builder() -> HookRegistryBuilder {
        HookRegistryBuilder::default()
    }

    /// Registry with no hooks. Every operation runs straight through.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Before-hook registered for `O`, if any.
    #[must_use]
    pub fn before<O: ApiOperation>(&self) -> Option<&dyn BeforeHook<O::Request>> {
        self.before
            .get(O::NAME)?
            .downcast_ref::<Box<dyn BeforeHook<O::Request>>>()
            .map(Box::as_ref)
    }

    /// After-hook registered for `O`, if any.
    #[must_use]
    pub fn after<O: ApiOperation>(&self) -> Option<&dyn AfterHook<O::Response>> {
        self.after
            .get(O::NAME)?
            .downcast_ref::<Box<dyn AfterHook<O::Response>>>()
            .map(Box::as_ref)
    }

    /// Whether a hook exists for `operation` in `direction`.
    ///
    /// `Direction::Call` never has hooks.
    #[must_use]
    pub fn lookup(&self, operation: &str, direction: Direction) -> bool {
        match direction {
            Direction::Before => self.before.contains_key(operation),
            Direction::After => self.after.contains_key(operation),
            Direction::Call => false,
        }
    }

    /// Total number of registered hooks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.before.len() + self.after.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut before: Vec<_> = self.before.keys().copied().collect();
        let mut after: Vec<_> = self.after.keys().copied().collect();
        before.sort_unstable();
        after.sort_unstable();
        f.debug_struct("HookRegistry")
            .field("before", &before)
            .field("after", &after)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// HookRegistryBuilder
// ---------------------------------------------------------------------------

/// Startup-time collector for hooks.
#[derive(Default)]
pub struct HookRegistryBuilder {
    before: HashMap<&'static str, Slot>,
    after: HashMap<&'static str, Slot>,
}

impl HookRegistryBuilder {
    /// Registers the before-hook for `O`. A second registration replaces
    /// the first.
    #[must_use]
    pub fn before<O: ApiOperation>(
        mut self,
        hook: impl BeforeHook<O::Request> + 'static,
    ) -> Self {
        let boxed: Box<dyn BeforeHook<O::Request>> = Box::new(hook);
        if self.before.insert(O::NAME, Box::new(boxed)).is_some() {
            tracing::warn!(operation = O::NAME, "replacing registered before hook");
        }
        self
    }

    /// Registers the after-hook for `O`. A second registration replaces
    /// the first.
    #[must_use]
    pub fn after<O: ApiOperation>(mut self, hook: impl AfterHook<O::Response> + 'static) -> Self {
        let boxed: Box<dyn AfterHook<O::Response>> = Box::new(hook);
        if self.after.insert(O::NAME, Box::new(boxed)).is_some() {
            tracing::warn!(operation = O::NAME, "replacing registered after hook");
        }
        self
    }

    #[must_use]
    pub fn build(self) -> HookRegistry {
        tracing::info!(
            before = self.before.len(),
            after = self.after.len(),
            "hook registry built"
        );
        HookRegistry {
            before: self.before,
            after: self.after,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Core hook traits and closure adapters.

use std::marker::PhantomData;

use async_trait::async_trait;
use groupgate_core::{IdentityContext, Status};

/// What a before-hook hands back to the pipeline.
///
/// - `Ok(Some(request))` — continue with `request` (which may be the input
///   unchanged or a full replacement).
/// - `Ok(None)` — the hook produced nothing. This is a hook defect and the
///   request fails with `INTERNAL`.
/// - `Err(status)` — reject the request with exactly this code and message.
pub type BeforeOutcome<R> = Result<Option<R>, Status>;

/// Extension logic that runs before the domain call and may rewrite or
/// reject the request.
#[async_trait]
pub trait BeforeHook<R>: Send + Sync
where
    R: Send + 'static,
{
    async fn call(&self, identity: &IdentityContext, request: R) -> BeforeOutcome<R>;
}

/// Extension logic that observes a successful response.
///
/// Errors are advisory: they are logged and traced, but the response has
/// already been decided and is returned unchanged.
#[async_trait]
pub trait AfterHook<R>: Send + Sync
where
    R: Sync + 'static,
{
    async fn call(&self, identity: &IdentityContext, response: &R) -> anyhow::Result<()>;
}

// ---------------------------------------------------------------------------
// Closure adapters
// ---------------------------------------------------------------------------

/// [`BeforeHook`] backed by a synchronous closure. Built with [`before_fn`].
pub struct FnBeforeHook<F, R> {
    f: F,
    _request: PhantomData<fn(R) -> R>,
}

/// Wraps a closure as a [`BeforeHook`].
#[must_use]
pub fn before_fn<F, R>(f: F) -> FnBeforeHook<F, R>
where
    F: Fn(&IdentityContext, R) -> BeforeOutcome<R> + Send + Sync,
    R: Send + 'static,
{
    FnBeforeHook {
        f,
        _request: PhantomData,
    }
}

#[async_trait]
impl<F, R> BeforeHook<R> for FnBeforeHook<F, R>
where
    F: Fn(&IdentityContext, R) -> BeforeOutcome<R> + Send + Sync,
    R: Send + 'static,
{
    async fn call(&self, identity: &IdentityContext, request: R) -> BeforeOutcome<R> {
        (self.f)(identity, request)
    }
}

/// [`AfterHook`] backed by a synchronous closure. Built with [`after_fn`].
pub struct FnAfterHook<F, R> {
    f: F,
    _response: PhantomData<fn(&R)>,
}

/// Wraps a closure as an [`AfterHook`].
#[must_use]
pub fn after_fn<F, R>(f: F) -> FnAfterHook<F, R>
where
    F: Fn(&IdentityContext, &R) -> anyhow::Result<()> + Send + Sync,
    R: Sync + 'static,
{
    FnAfterHook {
        f,
        _response: PhantomData,
    }
}

#[async_trait]
impl<F, R> AfterHook<R> for FnAfterHook<F, R>
where
    F: Fn(&IdentityContext, &R) -> anyhow::Result<()> + Send + Sync,
    R: Sync + 'static,
{
    async fn call(&self, identity: &IdentityContext, response: &R) -> anyhow::Result<()> {
        (self.f)(identity, response)
    }
}

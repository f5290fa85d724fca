//! Instrumented hook invocation.
//!
//! Each call runs inside an `api_hook` span, is timed with a monotonic clock,
//! and records exactly one [`Measurement`] whatever the hook's outcome.

use std::time::{Duration, Instant};

use groupgate_core::{IdentityContext, Status};
use tracing::{info_span, Instrument};

use crate::hooks::hook::{AfterHook, BeforeHook};
use crate::service::config::ApiConfig;
use crate::telemetry::{Direction, Measurement, MetricsSink};

/// Message returned when a before-hook succeeds without producing a request.
pub const BEFORE_HOOK_NO_RESULT: &str = "Runtime Before hook returned no result.";
/// Message returned when a before-hook exceeds the configured deadline.
pub const BEFORE_HOOK_TIMED_OUT: &str = "Runtime Before hook timed out.";

/// Everything an invocation needs besides the hook and its payload.
#[derive(Clone, Copy)]
pub(crate) struct Invocation<'a> {
    pub operation: &'static str,
    pub identity: &'a IdentityContext,
    pub config: &'a ApiConfig,
    pub sink: &'a dyn MetricsSink,
}

impl Invocation<'_> {
    pub(crate) fn name(&self, direction: Direction) -> String {
        self.config.qualified_name(direction, self.operation)
    }

    /// Records one measurement and returns the microseconds it carries.
    pub(crate) fn measure(&self, direction: Direction, elapsed: Duration) -> u64 {
        let measurement =
            Measurement::new(self.name(direction), self.operation, direction, elapsed);
        self.sink.record(&measurement);
        measurement.elapsed_us
    }
}

/// Runs a before-hook and resolves its outcome to the request to continue
/// with.
///
/// # Errors
///
/// The hook's own status when it rejects, `INTERNAL` when it returns no
/// request or misses the deadline.
pub(crate) async fn invoke_before<R>(
    hook: &dyn BeforeHook<R>,
    inv: Invocation<'_>,
    request: R,
) -> Result<R, Status>
where
    R: Send + 'static,
{
    let span = info_span!(
        "api_hook",
        hook = %inv.name(Direction::Before),
        direction = "before",
        duration_us = tracing::field::Empty,
        outcome = tracing::field::Empty,
    );

    async move {
        let start = Instant::now();
        let result = match inv.config.hook_timeout() {
            Some(limit) => tokio::time::timeout(limit, hook.call(inv.identity, request))
                .await
                .ok(),
            None => Some(hook.call(inv.identity, request).await),
        };
        let elapsed_us = inv.measure(Direction::Before, start.elapsed());

        let (outcome, resolved) = match result {
            Some(Ok(Some(request))) => ("ok", Ok(request)),
            Some(Ok(None)) => {
                tracing::error!(operation = inv.operation, "before hook returned no result");
                ("no_result", Err(Status::internal(BEFORE_HOOK_NO_RESULT)))
            }
            Some(Err(status)) => {
                tracing::debug!(
                    operation = inv.operation,
                    code = %status.code,
                    "before hook rejected request"
                );
                ("rejected", Err(status))
            }
            None => {
                tracing::warn!(operation = inv.operation, "before hook timed out");
                ("timeout", Err(Status::internal(BEFORE_HOOK_TIMED_OUT)))
            }
        };

        let span = tracing::Span::current();
        span.record("duration_us", elapsed_us);
        span.record("outcome", outcome);
        resolved
    }
    .instrument(span)
    .await
}

/// Runs an after-hook. Failures and timeouts are logged, never returned.
pub(crate) async fn invoke_after<R>(hook: &dyn AfterHook<R>, inv: Invocation<'_>, response: &R)
where
    R: Sync + 'static,
{
    let span = info_span!(
        "api_hook",
        hook = %inv.name(Direction::After),
        direction = "after",
        duration_us = tracing::field::Empty,
        outcome = tracing::field::Empty,
    );

    async move {
        let start = Instant::now();
        let result = match inv.config.hook_timeout() {
            Some(limit) => tokio::time::timeout(limit, hook.call(inv.identity, response))
                .await
                .ok(),
            None => Some(hook.call(inv.identity, response).await),
        };
        let elapsed_us = inv.measure(Direction::After, start.elapsed());

        let outcome = match result {
            Some(Ok(())) => "ok",
            Some(Err(err)) => {
                tracing::warn!(operation = inv.operation, error = %err, "after hook failed");
                "error"
            }
            None => {
                tracing::warn!(operation = inv.operation, "after hook timed out");
                "timeout"
            }
        };

        let span = tracing::Span::current();
        span.record("duration_us", elapsed_us);
        span.record("outcome", outcome);
    }
    .instrument(span)
    .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

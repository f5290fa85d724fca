//! Domain error → status translation.

use groupgate_core::{Status, StatusCode};

use crate::traits::{DomainError, Sentinel};

/// One row of an error table.
#[derive(Debug, Clone, Copy)]
pub struct ErrorRule {
    pub sentinel: Sentinel,
    pub code: StatusCode,
    pub message: &'static str,
}

impl ErrorRule {
    #[must_use]
    pub const fn new(sentinel: Sentinel, code: StatusCode, message: &'static str) -> Self {
        Self {
            sentinel,
            code,
            message,
        }
    }
}

/// Ordered sentinel → status mapping owned by a single operation.
///
/// Rules are checked top to bottom. Anything that matches no rule becomes
/// `INTERNAL` with the table's fallback message.
#[derive(Debug, Clone, Copy)]
pub struct ErrorTable {
    pub operation: &'static str,
    pub rules: &'static [ErrorRule],
    pub fallback: &'static str,
}

impl ErrorTable {
    #[must_use]
    pub const fn new(
        operation: &'static str,
        rules: &'static [ErrorRule],
        fallback: &'static str,
    ) -> Self {
        Self {
            operation,
            rules,
            fallback,
        }
    }

    /// Rule matching `sentinel`, if this operation declares one.
    #[must_use]
    pub fn rule_for(&self, sentinel: Sentinel) -> Option<&ErrorRule> {
        self.rules.iter().find(|rule| rule.sentinel == sentinel)
    }

    /// Translates a domain error into the status returned to the caller.
    ///
    /// The raw error is logged; only the table's messages reach the caller.
    #[must_use]
    pub fn translate(&self, err: &DomainError) -> Status {
        if let Some(rule) = err.sentinel().and_then(|s| self.rule_for(s)) {
            tracing::debug!(
                operation = self.operation,
                sentinel = ?rule.sentinel,
                code = %rule.code,
                "domain error translated"
            );
            return Status::new(rule.code, rule.message);
        }

        tracing::error!(
            operation = self.operation,
            error = %err,
            "unmapped domain error"
        );
        Status::internal(self.fallback)
    }
}

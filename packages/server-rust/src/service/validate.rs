//! Shared request validation rules.
//!
//! Per-operation validators in `service::ops` compose these helpers. Every
//! failure is `INVALID_ARGUMENT` with a message naming the offending field.

use groupgate_core::Status;
use uuid::Uuid;

/// Smallest accepted listing page size.
pub const LIST_LIMIT_MIN: i32 = 1;
/// Largest accepted listing page size.
pub const LIST_LIMIT_MAX: i32 = 100;

/// Outcome of validating a request.
#[derive(Debug)]
pub enum Validated<P, R> {
    /// Request is well formed; continue with these dispatch parameters.
    Proceed(P),
    /// Request is well formed but nothing needs doing. The pipeline returns
    /// this response without running hooks or the domain call.
    Complete(R),
}

/// Parses a required identifier field.
///
/// # Errors
///
/// `"<field> must be set."` when empty, `"<field> must be a valid ID."` when
/// it does not parse.
pub fn require_id(raw: &str, field: &str) -> Result<Uuid, Status> {
    if raw.is_empty() {
        return Err(Status::invalid_argument(format!("{field} must be set.")));
    }
    Uuid::parse_str(raw)
        .map_err(|_| Status::invalid_argument(format!("{field} must be a valid ID.")))
}

/// Parses a list of identifiers element by element.
///
/// The nil UUID is rejected along with unparsable values. The first bad
/// element aborts the whole list.
///
/// # Errors
///
/// `"<field> must be a valid ID."` for the first malformed element.
pub fn parse_id_list(raw: &[String], field: &str) -> Result<Vec<Uuid>, Status> {
    raw.iter()
        .map(|id| match Uuid::parse_str(id) {
            Ok(parsed) if !parsed.is_nil() => Ok(parsed),
            _ => Err(Status::invalid_argument(format!("{field} must be a valid ID."))),
        })
        .collect()
}

/// Rejects a present-but-empty optional field.
///
/// # Errors
///
/// `message` when the field is `Some("")`.
pub fn reject_empty(value: Option<&str>, message: &str) -> Result<(), Status> {
    match value {
        Some("") => Err(Status::invalid_argument(message)),
        _ => Ok(()),
    }
}

/// Resolves a listing page size, falling back to `default` when absent.
///
/// The fallback is clamped into the accepted range, so a misconfigured
/// default never reaches the domain.
///
/// # Errors
///
/// When the requested size is outside `LIST_LIMIT_MIN..=LIST_LIMIT_MAX`.
pub fn page_limit(requested: Option<i32>, default: u32) -> Result<u32, Status> {
    match requested {
        None => Ok(default.clamp(
            LIST_LIMIT_MIN.unsigned_abs(),
            LIST_LIMIT_MAX.unsigned_abs(),
        )),
        Some(limit) if (LIST_LIMIT_MIN..=LIST_LIMIT_MAX).contains(&limit) => {
            Ok(limit.unsigned_abs())
        }
        Some(_) => Err(Status::invalid_argument(format!(
            "Invalid limit - limit must be between {LIST_LIMIT_MIN} and {LIST_LIMIT_MAX}."
        ))),
    }
}

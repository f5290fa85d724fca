//! Request extractors and status-to-HTTP mapping.
//!
//! Every extractor here rejects with [`ApiError`], so clients only ever see
//! the `{"code", "message"}` envelope. Parser detail from axum's own
//! rejections is logged and replaced by a fixed message.

use axum::body::Bytes;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::header::CONTENT_TYPE;
use axum::http::request::Parts;
use axum::http::StatusCode as HttpStatus;
use axum::response::{IntoResponse, Response};
use axum::Json;
use groupgate_core::{IdentityContext, Status, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Message returned for a body that is not the expected JSON document.
pub const INVALID_BODY: &str = "Request body must be valid JSON.";
/// Message returned for a malformed query string.
pub const INVALID_QUERY: &str = "Query parameters are malformed.";
/// Message returned for a path segment that cannot be decoded.
pub const INVALID_PATH: &str = "Path parameters are malformed.";

/// Authenticated caller, read from request extensions.
///
/// The authentication layer in front of the router inserts an
/// [`IdentityContext`]; a request without one is rejected `401`.
#[derive(Debug, Clone)]
pub struct Caller(pub IdentityContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<IdentityContext>()
            .cloned()
            .map(Caller)
            .ok_or_else(|| {
                ApiError(Status::new(
                    StatusCode::Unauthenticated,
                    "Auth token required.",
                ))
            })
    }
}

/// Pipeline status rendered as an HTTP response with body
/// `{"code": <n>, "message": "..."}`.
#[derive(Debug)]
pub struct ApiError(pub Status);

impl From<Status> for ApiError {
    fn from(status: Status) -> Self {
        Self(status)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected request body");
        Self(Status::invalid_argument(INVALID_BODY))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected query string");
        Self(Status::invalid_argument(INVALID_QUERY))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(detail = %rejection.body_text(), "rejected path parameters");
        Self(Status::invalid_argument(INVALID_PATH))
    }
}

/// JSON request body.
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// JSON request body that may be left out entirely.
///
/// A request without `Content-Type` and with an empty body yields
/// `T::default()`. Anything else is parsed like [`JsonBody`].
#[derive(Debug)]
pub struct JsonOrDefault<T>(pub T);

impl<S, T> FromRequest<S> for JsonOrDefault<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if req.headers().contains_key(CONTENT_TYPE) {
            let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state).await.map_err(|rejection| {
            tracing::debug!(detail = %rejection.body_text(), "failed to read request body");
            ApiError(Status::invalid_argument(INVALID_BODY))
        })?;
        if bytes.is_empty() {
            Ok(Self(T::default()))
        } else {
            tracing::debug!(len = bytes.len(), "request body sent without content type");
            Err(ApiError(Status::invalid_argument(INVALID_BODY)))
        }
    }
}

/// Deserialized query string.
#[derive(Debug)]
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// Decoded path parameters.
#[derive(Debug)]
pub struct PathParam<T>(pub T);

impl<S, T> FromRequestParts<S> for PathParam<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(Self(value))
    }
}

/// HTTP status used for each RPC status code.
#[must_use]
pub fn http_status(code: StatusCode) -> HttpStatus {
    match code {
        StatusCode::InvalidArgument | StatusCode::FailedPrecondition | StatusCode::OutOfRange => {
            HttpStatus::BAD_REQUEST
        }
        StatusCode::Unauthenticated => HttpStatus::UNAUTHORIZED,
        StatusCode::PermissionDenied => HttpStatus::FORBIDDEN,
        StatusCode::NotFound => HttpStatus::NOT_FOUND,
        StatusCode::AlreadyExists | StatusCode::Aborted => HttpStatus::CONFLICT,
        StatusCode::ResourceExhausted => HttpStatus::TOO_MANY_REQUESTS,
        StatusCode::Cancelled => {
            HttpStatus::from_u16(499).unwrap_or(HttpStatus::INTERNAL_SERVER_ERROR)
        }
        StatusCode::Unimplemented => HttpStatus::NOT_IMPLEMENTED,
        StatusCode::Unavailable => HttpStatus::SERVICE_UNAVAILABLE,
        StatusCode::DeadlineExceeded => HttpStatus::GATEWAY_TIMEOUT,
        StatusCode::Unknown | StatusCode::Internal | StatusCode::DataLoss => {
            HttpStatus::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "code": self.0.code.as_i32(),
            "message": self.0.message,
        });
        (http_status(self.0.code), Json(body)).into_response()
    }
}

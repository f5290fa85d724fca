//! Operation descriptors consumed by the pipeline.

use std::fmt::Debug;

use async_trait::async_trait;
use groupgate_core::{IdentityContext, Status};

use crate::service::config::ApiConfig;
use crate::service::errors::ErrorTable;
use crate::service::validate::Validated;
use crate::traits::{DomainError, GroupDomain, PresenceTracker};

/// Collaborators available to a domain dispatch.
#[derive(Clone, Copy)]
pub struct DispatchContext<'a> {
    pub domain: &'a dyn GroupDomain,
    pub presence: &'a dyn PresenceTracker,
    pub identity: &'a IdentityContext,
}

/// Static description of one group API operation.
///
/// Implemented by the unit structs in [`crate::service::ops`]. The pipeline in
/// [`crate::service::api::GroupApi::execute`] is generic over this trait, so
/// the validate/hook/dispatch/translate sequence exists exactly once.
#[async_trait]
pub trait ApiOperation: Send + Sync + 'static {
    /// Operation name used for hook lookup, span and metric names.
    const NAME: &'static str;

    type Request: Debug + Send + Sync + 'static;
    /// Parsed form of the request handed to [`ApiOperation::dispatch`].
    type Params: Send + 'static;
    type Response: Debug + Send + Sync + 'static;

    /// Checks the request and derives dispatch parameters.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` naming the offending field.
    fn validate(
        request: &Self::Request,
        config: &ApiConfig,
    ) -> Result<Validated<Self::Params, Self::Response>, Status>;

    /// Performs the domain call.
    ///
    /// # Errors
    ///
    /// Whatever the domain reports; the pipeline translates it through
    /// [`ApiOperation::errors`].
    async fn dispatch(
        ctx: DispatchContext<'_>,
        params: Self::Params,
    ) -> Result<Self::Response, DomainError>;

    /// Sentinel translation table for this operation.
    fn errors() -> &'static ErrorTable;
}

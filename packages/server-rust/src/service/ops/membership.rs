//! Membership operations: join, leave, and bulk add/kick/promote.

use async_trait::async_trait;
use groupgate_core::messages::{
    AddGroupUsersRequest, Empty, JoinGroupRequest, KickGroupUsersRequest, LeaveGroupRequest,
    PromoteGroupUsersRequest,
};
use groupgate_core::{Status, StatusCode};
use uuid::Uuid;

use crate::service::config::ApiConfig;
use crate::service::errors::{ErrorRule, ErrorTable};
use crate::service::operation::{ApiOperation, DispatchContext};
use crate::service::validate::{parse_id_list, require_id, Validated};
use crate::traits::{DomainError, Sentinel};

// ---------------------------------------------------------------------------
// JoinGroup
// ---------------------------------------------------------------------------

pub struct JoinGroup;

const JOIN_RULES: &[ErrorRule] = &[
    ErrorRule::new(Sentinel::GroupNotFound, StatusCode::NotFound, "Group not found."),
    ErrorRule::new(Sentinel::GroupFull, StatusCode::InvalidArgument, "Group is full."),
];

static JOIN_ERRORS: ErrorTable =
    ErrorTable::new(JoinGroup::NAME, JOIN_RULES, "Error while trying to join group.");

#[async_trait]
impl ApiOperation for JoinGroup {
    const NAME: &'static str = "JoinGroup";
    type Request = JoinGroupRequest;
    type Params = Uuid;
    type Response = Empty;

    fn validate(
        request: &JoinGroupRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<Uuid, Empty>, Status> {
        require_id(&request.group_id, "Group ID").map(Validated::Proceed)
    }

    async fn dispatch(ctx: DispatchContext<'_>, group_id: Uuid) -> Result<Empty, DomainError> {
        ctx.domain.join_group(group_id, ctx.identity.user_id).await?;
        Ok(Empty {})
    }

    fn errors() -> &'static ErrorTable {
        &JOIN_ERRORS
    }
}

// ---------------------------------------------------------------------------
// LeaveGroup
// ---------------------------------------------------------------------------

pub struct LeaveGroup;

const LEAVE_RULES: &[ErrorRule] = &[ErrorRule::new(
    Sentinel::GroupLastSuperadmin,
    StatusCode::InvalidArgument,
    "Cannot leave group when you are the last superadmin.",
)];

static LEAVE_ERRORS: ErrorTable = ErrorTable::new(
    LeaveGroup::NAME,
    LEAVE_RULES,
    "Error while trying to leave group.",
);

#[async_trait]
impl ApiOperation for LeaveGroup {
    const NAME: &'static str = "LeaveGroup";
    type Request = LeaveGroupRequest;
    type Params = Uuid;
    type Response = Empty;

    fn validate(
        request: &LeaveGroupRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<Uuid, Empty>, Status> {
        require_id(&request.group_id, "Group ID").map(Validated::Proceed)
    }

    async fn dispatch(ctx: DispatchContext<'_>, group_id: Uuid) -> Result<Empty, DomainError> {
        ctx.domain.leave_group(group_id, ctx.identity.user_id).await?;
        Ok(Empty {})
    }

    fn errors() -> &'static ErrorTable {
        &LEAVE_ERRORS
    }
}

// ---------------------------------------------------------------------------
// Bulk member operations
// ---------------------------------------------------------------------------

/// Dispatch parameters shared by add, kick and promote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberBatch {
    pub group_id: Uuid,
    pub user_ids: Vec<Uuid>,
}

fn validate_batch(
    group_id: &str,
    user_ids: &[String],
) -> Result<Validated<MemberBatch, Empty>, Status> {
    let group_id = require_id(group_id, "Group ID")?;
    if user_ids.is_empty() {
        return Ok(Validated::Complete(Empty {}));
    }
    let user_ids = parse_id_list(user_ids, "User ID")?;
    Ok(Validated::Proceed(MemberBatch { group_id, user_ids }))
}

/// Declares a bulk member operation. The three differ only in request type,
/// domain method and error table.
macro_rules! member_batch_op {
    (
        $(#[$meta:meta])*
        $name:ident, $request:ty, $method:ident, $rules:ident, $errors:ident, $fallback:expr
    ) => {
        $(#[$meta])*
        pub struct $name;

        static $errors: ErrorTable = ErrorTable::new(stringify!($name), $rules, $fallback);

        #[async_trait]
        impl ApiOperation for $name {
            const NAME: &'static str = stringify!($name);
            type Request = $request;
            type Params = MemberBatch;
            type Response = Empty;

            fn validate(
                request: &$request,
                _config: &ApiConfig,
            ) -> Result<Validated<MemberBatch, Empty>, Status> {
                validate_batch(&request.group_id, &request.user_ids)
            }

            async fn dispatch(
                ctx: DispatchContext<'_>,
                batch: MemberBatch,
            ) -> Result<Empty, DomainError> {
                ctx.domain
                    .$method(ctx.identity.user_id, batch.group_id, batch.user_ids)
                    .await?;
                Ok(Empty {})
            }

            fn errors() -> &'static ErrorTable {
                &$errors
            }
        }
    };
}

const ADD_RULES: &[ErrorRule] = &[
    ErrorRule::new(
        Sentinel::GroupPermissionDenied,
        StatusCode::NotFound,
        "Group not found or permission denied.",
    ),
    ErrorRule::new(Sentinel::GroupFull, StatusCode::InvalidArgument, "Group is full."),
];

const KICK_RULES: &[ErrorRule] = &[ErrorRule::new(
    Sentinel::GroupPermissionDenied,
    StatusCode::NotFound,
    "Group not found or permission denied.",
)];

const PROMOTE_RULES: &[ErrorRule] = &[ErrorRule::new(
    Sentinel::GroupPermissionDenied,
    StatusCode::NotFound,
    "Group not found or permission denied.",
)];

member_batch_op!(
    /// Adds users to a group.
    AddGroupUsers,
    AddGroupUsersRequest,
    add_group_users,
    ADD_RULES,
    ADD_ERRORS,
    "Error while trying to add users to a group."
);

member_batch_op!(
    /// Removes users from a group.
    KickGroupUsers,
    KickGroupUsersRequest,
    kick_group_users,
    KICK_RULES,
    KICK_ERRORS,
    "Error while trying to kick users from a group."
);

member_batch_op!(
    /// Raises users one role within a group.
    PromoteGroupUsers,
    PromoteGroupUsersRequest,
    promote_group_users,
    PROMOTE_RULES,
    PROMOTE_ERRORS,
    "Error while trying to promote users in a group."
);

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

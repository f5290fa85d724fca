//! Group lifecycle operations: create, update, delete.

use async_trait::async_trait;
use groupgate_core::messages::{
    CreateGroupRequest, DeleteGroupRequest, Empty, Group, UpdateGroupRequest,
};
use groupgate_core::{Status, StatusCode};
use uuid::Uuid;

use crate::service::config::ApiConfig;
use crate::service::errors::{ErrorRule, ErrorTable};
use crate::service::operation::{ApiOperation, DispatchContext};
use crate::service::validate::{reject_empty, require_id, Validated};
use crate::traits::{DomainError, GroupUpdate, NewGroup, Sentinel};

// ---------------------------------------------------------------------------
// CreateGroup
// ---------------------------------------------------------------------------

pub struct CreateGroup;

const CREATE_RULES: &[ErrorRule] = &[ErrorRule::new(
    Sentinel::GroupNameInUse,
    StatusCode::InvalidArgument,
    "Group name is in use.",
)];

static CREATE_ERRORS: ErrorTable = ErrorTable::new(
    CreateGroup::NAME,
    CREATE_RULES,
    "Error while trying to create group.",
);

#[async_trait]
impl ApiOperation for CreateGroup {
    const NAME: &'static str = "CreateGroup";
    type Request = CreateGroupRequest;
    type Params = CreateGroupRequest;
    type Response = Group;

    fn validate(
        request: &CreateGroupRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<CreateGroupRequest, Group>, Status> {
        if request.name.is_empty() {
            return Err(Status::invalid_argument("Group name must be set."));
        }
        Ok(Validated::Proceed(request.clone()))
    }

    async fn dispatch(
        ctx: DispatchContext<'_>,
        params: CreateGroupRequest,
    ) -> Result<Group, DomainError> {
        let caller = ctx.identity.user_id;
        let group = NewGroup {
            creator_id: caller,
            name: params.name,
            lang_tag: params.lang_tag,
            description: params.description,
            avatar_url: params.avatar_url,
            metadata: String::new(),
            open: params.open,
            max_count: None,
        };
        ctx.domain.create_group(caller, group).await
    }

    fn errors() -> &'static ErrorTable {
        &CREATE_ERRORS
    }
}

// ---------------------------------------------------------------------------
// UpdateGroup
// ---------------------------------------------------------------------------

pub struct UpdateGroup;

const UPDATE_RULES: &[ErrorRule] = &[
    ErrorRule::new(
        Sentinel::GroupPermissionDenied,
        StatusCode::NotFound,
        "Group not found or you're not allowed to update.",
    ),
    ErrorRule::new(
        Sentinel::GroupNoUpdateOps,
        StatusCode::InvalidArgument,
        "Specify at least one field to update.",
    ),
    ErrorRule::new(
        Sentinel::GroupNotUpdated,
        StatusCode::InvalidArgument,
        "No new fields in group update.",
    ),
];

static UPDATE_ERRORS: ErrorTable = ErrorTable::new(
    UpdateGroup::NAME,
    UPDATE_RULES,
    "Error while trying to update group.",
);

#[async_trait]
impl ApiOperation for UpdateGroup {
    const NAME: &'static str = "UpdateGroup";
    type Request = UpdateGroupRequest;
    type Params = (Uuid, GroupUpdate);
    type Response = Empty;

    fn validate(
        request: &UpdateGroupRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<(Uuid, GroupUpdate), Empty>, Status> {
        let group_id = require_id(&request.group_id, "Group ID")?;
        reject_empty(request.name.as_deref(), "Group name cannot be empty.")?;
        reject_empty(request.lang_tag.as_deref(), "Group language cannot be empty.")?;

        let update = GroupUpdate {
            name: request.name.clone(),
            lang_tag: request.lang_tag.clone(),
            description: request.description.clone(),
            avatar_url: request.avatar_url.clone(),
            open: request.open,
            ..GroupUpdate::default()
        };
        Ok(Validated::Proceed((group_id, update)))
    }

    async fn dispatch(
        ctx: DispatchContext<'_>,
        params: (Uuid, GroupUpdate),
    ) -> Result<Empty, DomainError> {
        let (group_id, update) = params;
        ctx.domain
            .update_group(group_id, ctx.identity.user_id, update)
            .await?;
        Ok(Empty {})
    }

    fn errors() -> &'static ErrorTable {
        &UPDATE_ERRORS
    }
}

// ---------------------------------------------------------------------------
// DeleteGroup
// ---------------------------------------------------------------------------

pub struct DeleteGroup;

// Denial maps to INVALID_ARGUMENT here, unlike update which uses NOT_FOUND.
const DELETE_RULES: &[ErrorRule] = &[ErrorRule::new(
    Sentinel::GroupPermissionDenied,
    StatusCode::InvalidArgument,
    "Group not found or you're not allowed to delete.",
)];

static DELETE_ERRORS: ErrorTable = ErrorTable::new(
    DeleteGroup::NAME,
    DELETE_RULES,
    "Error while trying to delete group.",
);

#[async_trait]
impl ApiOperation for DeleteGroup {
    const NAME: &'static str = "DeleteGroup";
    type Request = DeleteGroupRequest;
    type Params = Uuid;
    type Response = Empty;

    fn validate(
        request: &DeleteGroupRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<Uuid, Empty>, Status> {
        require_id(&request.group_id, "Group ID").map(Validated::Proceed)
    }

    async fn dispatch(ctx: DispatchContext<'_>, group_id: Uuid) -> Result<Empty, DomainError> {
        ctx.domain
            .delete_group(group_id, ctx.identity.user_id)
            .await?;
        Ok(Empty {})
    }

    fn errors() -> &'static ErrorTable {
        &DELETE_ERRORS
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

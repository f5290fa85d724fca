//! Read-only listings.

use async_trait::async_trait;
use groupgate_core::messages::{
    GroupList, GroupUserList, ListGroupUsersRequest, ListGroupsRequest, ListUserGroupsRequest,
    UserGroupList,
};
use groupgate_core::Status;
use uuid::Uuid;

use crate::service::config::ApiConfig;
use crate::service::errors::{ErrorRule, ErrorTable};
use crate::service::operation::{ApiOperation, DispatchContext};
use crate::service::validate::{page_limit, require_id, Validated};
use crate::traits::DomainError;

// Listing failures carry no sentinel mapping; everything becomes INTERNAL.
const NO_RULES: &[ErrorRule] = &[];

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

pub struct ListGroupUsers;

static LIST_GROUP_USERS_ERRORS: ErrorTable = ErrorTable::new(
    ListGroupUsers::NAME,
    NO_RULES,
    "Error while trying to list users in a group.",
);

#[async_trait]
impl ApiOperation for ListGroupUsers {
    const NAME: &'static str = "ListGroupUsers";
    type Request = ListGroupUsersRequest;
    type Params = Uuid;
    type Response = GroupUserList;

    fn validate(
        request: &ListGroupUsersRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<Uuid, GroupUserList>, Status> {
        require_id(&request.group_id, "Group ID").map(Validated::Proceed)
    }

    async fn dispatch(
        ctx: DispatchContext<'_>,
        group_id: Uuid,
    ) -> Result<GroupUserList, DomainError> {
        ctx.domain.list_group_users(group_id, ctx.presence).await
    }

    fn errors() -> &'static ErrorTable {
        &LIST_GROUP_USERS_ERRORS
    }
}

pub struct ListUserGroups;

static LIST_USER_GROUPS_ERRORS: ErrorTable = ErrorTable::new(
    ListUserGroups::NAME,
    NO_RULES,
    "Error while trying to list groups for a user.",
);

#[async_trait]
impl ApiOperation for ListUserGroups {
    const NAME: &'static str = "ListUserGroups";
    type Request = ListUserGroupsRequest;
    type Params = Uuid;
    type Response = UserGroupList;

    fn validate(
        request: &ListUserGroupsRequest,
        _config: &ApiConfig,
    ) -> Result<Validated<Uuid, UserGroupList>, Status> {
        require_id(&request.user_id, "User ID").map(Validated::Proceed)
    }

    async fn dispatch(
        ctx: DispatchContext<'_>,
        user_id: Uuid,
    ) -> Result<UserGroupList, DomainError> {
        ctx.domain.list_user_groups(user_id).await
    }

    fn errors() -> &'static ErrorTable {
        &LIST_USER_GROUPS_ERRORS
    }
}

/// Search filter and page position for [`ListGroups`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupQuery {
    /// Name prefix filter. Empty input means no filter.
    pub name: Option<String>,
    pub limit: u32,
    pub cursor: Option<String>,
}

pub struct ListGroups;

static LIST_GROUPS_ERRORS: ErrorTable =
    ErrorTable::new(ListGroups::NAME, NO_RULES, "Error while trying to list groups.");

#[async_trait]
impl ApiOperation for ListGroups {
    const NAME: &'static str = "ListGroups";
    type Request = ListGroupsRequest;
    type Params = GroupQuery;
    type Response = GroupList;

    fn validate(
        request: &ListGroupsRequest,
        config: &ApiConfig,
    ) -> Result<Validated<GroupQuery, GroupList>, Status> {
        let limit = page_limit(request.limit, config.list_groups_default_limit)?;
        Ok(Validated::Proceed(GroupQuery {
            name: non_empty(request.name.as_deref()),
            limit,
            cursor: non_empty(request.cursor.as_deref()),
        }))
    }

    async fn dispatch(
        ctx: DispatchContext<'_>,
        query: GroupQuery,
    ) -> Result<GroupList, DomainError> {
        ctx.domain
            .list_groups(query.name, query.limit, query.cursor)
            .await
    }

    fn errors() -> &'static ErrorTable {
        &LIST_GROUPS_ERRORS
    }
}

//! Group API routes.
//!
//! Path segments fill the identifier fields of the request; everything
//! else comes from the JSON body or query string. Handlers do no
//! business logic of their own. The add/kick/promote routes accept a
//! missing body as an empty member list.

use axum::extract::State;
use axum::Json;
use groupgate_core::messages::{
    AddGroupUsersRequest, CreateGroupRequest, DeleteGroupRequest, Empty, Group, GroupList,
    GroupUserList, JoinGroupRequest, KickGroupUsersRequest, LeaveGroupRequest,
    ListGroupUsersRequest, ListGroupsRequest, ListUserGroupsRequest, PromoteGroupUsersRequest,
    UpdateGroupRequest, UserGroupList,
};
use serde::Deserialize;

use super::{ApiError, AppState, Caller, JsonBody, JsonOrDefault, PathParam, QueryParams};

/// Body of the add/kick/promote routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MemberIds {
    pub user_ids: Vec<String>,
}

pub async fn create_group(
    State(state): State<AppState>,
    Caller(identity): Caller,
    JsonBody(request): JsonBody<CreateGroupRequest>,
) -> Result<Json<Group>, ApiError> {
    Ok(Json(state.api.create_group(&identity, request).await?))
}

pub async fn update_group(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
    JsonBody(mut request): JsonBody<UpdateGroupRequest>,
) -> Result<Json<Empty>, ApiError> {
    request.group_id = group_id;
    Ok(Json(state.api.update_group(&identity, request).await?))
}

pub async fn delete_group(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<Empty>, ApiError> {
    let request = DeleteGroupRequest { group_id };
    Ok(Json(state.api.delete_group(&identity, request).await?))
}

pub async fn join_group(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<Empty>, ApiError> {
    let request = JoinGroupRequest { group_id };
    Ok(Json(state.api.join_group(&identity, request).await?))
}

pub async fn leave_group(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<Empty>, ApiError> {
    let request = LeaveGroupRequest { group_id };
    Ok(Json(state.api.leave_group(&identity, request).await?))
}

pub async fn add_group_users(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
    JsonOrDefault(body): JsonOrDefault<MemberIds>,
) -> Result<Json<Empty>, ApiError> {
    let request = AddGroupUsersRequest {
        group_id,
        user_ids: body.user_ids,
    };
    Ok(Json(state.api.add_group_users(&identity, request).await?))
}

pub async fn kick_group_users(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
    JsonOrDefault(body): JsonOrDefault<MemberIds>,
) -> Result<Json<Empty>, ApiError> {
    let request = KickGroupUsersRequest {
        group_id,
        user_ids: body.user_ids,
    };
    Ok(Json(state.api.kick_group_users(&identity, request).await?))
}

pub async fn promote_group_users(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
    JsonOrDefault(body): JsonOrDefault<MemberIds>,
) -> Result<Json<Empty>, ApiError> {
    let request = PromoteGroupUsersRequest {
        group_id,
        user_ids: body.user_ids,
    };
    Ok(Json(state.api.promote_group_users(&identity, request).await?))
}

pub async fn list_group_users(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(group_id): PathParam<String>,
) -> Result<Json<GroupUserList>, ApiError> {
    let request = ListGroupUsersRequest { group_id };
    Ok(Json(state.api.list_group_users(&identity, request).await?))
}

pub async fn list_user_groups(
    State(state): State<AppState>,
    Caller(identity): Caller,
    PathParam(user_id): PathParam<String>,
) -> Result<Json<UserGroupList>, ApiError> {
    let request = ListUserGroupsRequest { user_id };
    Ok(Json(state.api.list_user_groups(&identity, request).await?))
}

pub async fn list_groups(
    State(state): State<AppState>,
    Caller(identity): Caller,
    QueryParams(request): QueryParams<ListGroupsRequest>,
) -> Result<Json<GroupList>, ApiError> {
    Ok(Json(state.api.list_groups(&identity, request).await?))
}

//! Wire messages for the group API.
//!
//! All structs use `#[serde(rename_all = "camelCase")]`. Request types are
//! what clients send; response types are what the domain layer produces and
//! what hooks observe.

pub mod group;

pub use group::{
    AddGroupUsersRequest, CreateGroupRequest, DeleteGroupRequest, Empty, Group, GroupList,
    GroupMembershipState, GroupUser, GroupUserList, JoinGroupRequest, KickGroupUsersRequest,
    LeaveGroupRequest, ListGroupUsersRequest, ListGroupsRequest, ListUserGroupsRequest,
    PromoteGroupUsersRequest, UpdateGroupRequest, User, UserGroup, UserGroupList,
};

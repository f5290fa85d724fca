//! One descriptor per group API operation.
//!
//! Each unit struct implements [`ApiOperation`](crate::service::operation::ApiOperation):
//! its validator, its domain call and its error table. The pipeline itself
//! lives in [`crate::service::api`].

pub mod group;
pub mod listing;
pub mod membership;

pub use group::{CreateGroup, DeleteGroup, UpdateGroup};
pub use listing::{GroupQuery, ListGroupUsers, ListGroups, ListUserGroups};
pub use membership::{
    AddGroupUsers, JoinGroup, KickGroupUsers, LeaveGroup, MemberBatch, PromoteGroupUsers,
};

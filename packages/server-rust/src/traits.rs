use async_trait::async_trait;
use groupgate_core::messages::{Group, GroupList, GroupUserList, UserGroupList};
use uuid::Uuid;

/// Distinguished domain failure causes.
///
/// Compared by identity (variant), never by message text. The error tables in
/// `service::ops` map each of these to a caller-visible status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Sentinel {
    #[error("group name is in use")]
    GroupNameInUse,
    #[error("group permission denied")]
    GroupPermissionDenied,
    #[error("no group update operations")]
    GroupNoUpdateOps,
    #[error("group not updated")]
    GroupNotUpdated,
    #[error("group not found")]
    GroupNotFound,
    #[error("group is full")]
    GroupFull,
    #[error("group last superadmin")]
    GroupLastSuperadmin,
}

/// Error returned by a domain operation.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    /// A known failure cause the API layer may translate.
    #[error(transparent)]
    Sentinel(#[from] Sentinel),
    /// Anything else (storage failure, bug). Always surfaces as `INTERNAL`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DomainError {
    /// The sentinel carried by this error, if any.
    #[must_use]
    pub fn sentinel(&self) -> Option<Sentinel> {
        match self {
            Self::Sentinel(sentinel) => Some(*sentinel),
            Self::Other(_) => None,
        }
    }
}

/// Attributes of a group to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    pub creator_id: Uuid,
    pub name: String,
    pub lang_tag: String,
    pub description: String,
    pub avatar_url: String,
    pub metadata: String,
    pub open: bool,
    /// Member capacity; `None` lets the domain apply its default.
    pub max_count: Option<u32>,
}

/// Fields to change on an existing group. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupUpdate {
    pub creator_id: Option<Uuid>,
    pub name: Option<String>,
    pub lang_tag: Option<String>,
    pub description: Option<String>,
    pub avatar_url: Option<String>,
    pub metadata: Option<String>,
    pub open: Option<bool>,
    pub max_count: Option<u32>,
}

/// Group business logic consumed by the API pipeline.
///
/// Owns storage access, capacity limits, the role hierarchy and ownership
/// rules. Implementations must be safe to call from many requests at once.
/// `caller` is always the authenticated user the request runs as.
#[async_trait]
pub trait GroupDomain: Send + Sync {
    async fn create_group(&self, caller: Uuid, group: NewGroup) -> Result<Group, DomainError>;

    async fn update_group(
        &self,
        group_id: Uuid,
        caller: Uuid,
        update: GroupUpdate,
    ) -> Result<(), DomainError>;

    async fn delete_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError>;

    async fn join_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError>;

    /// Fails with [`Sentinel::GroupLastSuperadmin`] when the caller is the
    /// only remaining superadmin.
    async fn leave_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError>;

    async fn add_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError>;

    async fn kick_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError>;

    async fn promote_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError>;

    /// Members of a group, with `online` filled from `presence`.
    async fn list_group_users(
        &self,
        group_id: Uuid,
        presence: &dyn PresenceTracker,
    ) -> Result<GroupUserList, DomainError>;

    async fn list_user_groups(&self, user_id: Uuid) -> Result<UserGroupList, DomainError>;

    async fn list_groups(
        &self,
        name: Option<String>,
        limit: u32,
        cursor: Option<String>,
    ) -> Result<GroupList, DomainError>;
}

/// Online-presence lookup used to enrich member listings.
pub trait PresenceTracker: Send + Sync {
    fn is_online(&self, user_id: Uuid) -> bool;
}

/// Presence tracker for deployments without one: nobody is online.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPresence;

impl PresenceTracker for NoPresence {
    fn is_online(&self, _user_id: Uuid) -> bool {
        false
    }
}

//! Shared fakes for unit tests.

use async_trait::async_trait;
use groupgate_core::messages::{
    Group, GroupList, GroupMembershipState, GroupUser, GroupUserList, User, UserGroupList,
};
use groupgate_core::{ClientAddress, IdentityContext};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::telemetry::{Direction, Measurement, MetricsSink};
use crate::traits::{DomainError, GroupDomain, GroupUpdate, NewGroup, PresenceTracker, Sentinel};

pub fn identity() -> IdentityContext {
    IdentityContext::new(
        Uuid::new_v4(),
        "mira",
        1_900_000_000,
        ClientAddress::new("10.0.0.7", Some(40_112)),
    )
}

// ---------------------------------------------------------------------------
// RecordingSink
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingSink {
    recorded: Mutex<Vec<Measurement>>,
}

impl RecordingSink {
    pub fn take(&self) -> Vec<Measurement> {
        std::mem::take(&mut *self.recorded.lock())
    }

    pub fn count(&self, direction: Direction) -> usize {
        self.recorded
            .lock()
            .iter()
            .filter(|m| m.direction == direction)
            .count()
    }
}

impl MetricsSink for RecordingSink {
    fn record(&self, measurement: &Measurement) {
        self.recorded.lock().push(measurement.clone());
    }
}

// ---------------------------------------------------------------------------
// FakeDomain
// ---------------------------------------------------------------------------

/// One observed domain call with the parameters it received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainCall {
    CreateGroup { caller: Uuid, group: NewGroup },
    UpdateGroup { group_id: Uuid, caller: Uuid, update: GroupUpdate },
    DeleteGroup { group_id: Uuid, caller: Uuid },
    JoinGroup { group_id: Uuid, caller: Uuid },
    LeaveGroup { group_id: Uuid, caller: Uuid },
    AddGroupUsers { caller: Uuid, group_id: Uuid, user_ids: Vec<Uuid> },
    KickGroupUsers { caller: Uuid, group_id: Uuid, user_ids: Vec<Uuid> },
    PromoteGroupUsers { caller: Uuid, group_id: Uuid, user_ids: Vec<Uuid> },
    ListGroupUsers { group_id: Uuid },
    ListUserGroups { user_id: Uuid },
    ListGroups { name: Option<String>, limit: u32, cursor: Option<String> },
}

#[derive(Debug, Clone)]
enum Failure {
    Sentinel(Sentinel),
    Opaque(&'static str),
}

/// Domain that records every call and succeeds unless told to fail.
pub struct FakeDomain {
    calls: Mutex<Vec<DomainCall>>,
    failure: Option<Failure>,
    /// Member reported by `list_group_users`.
    pub member: Uuid,
}

impl Default for FakeDomain {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: None,
            member: Uuid::new_v4(),
        }
    }
}

impl FakeDomain {
    pub fn failing(sentinel: Sentinel) -> Self {
        Self {
            failure: Some(Failure::Sentinel(sentinel)),
            ..Self::default()
        }
    }

    pub fn failing_opaque(message: &'static str) -> Self {
        Self {
            failure: Some(Failure::Opaque(message)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<DomainCall> {
        self.calls.lock().clone()
    }

    fn observe(&self, call: DomainCall) -> Result<(), DomainError> {
        self.calls.lock().push(call);
        match &self.failure {
            None => Ok(()),
            Some(Failure::Sentinel(sentinel)) => Err((*sentinel).into()),
            Some(Failure::Opaque(message)) => Err(anyhow::anyhow!(*message).into()),
        }
    }
}

#[async_trait]
impl GroupDomain for FakeDomain {
    async fn create_group(&self, caller: Uuid, group: NewGroup) -> Result<Group, DomainError> {
        self.observe(DomainCall::CreateGroup {
            caller,
            group: group.clone(),
        })?;
        Ok(Group {
            id: Uuid::new_v4(),
            creator_id: group.creator_id,
            name: group.name,
            description: group.description,
            lang_tag: group.lang_tag,
            metadata: group.metadata,
            avatar_url: group.avatar_url,
            open: group.open,
            edge_count: 1,
            max_count: group.max_count.unwrap_or(100),
            create_time: 1_700_000_000,
            update_time: 1_700_000_000,
        })
    }

    async fn update_group(
        &self,
        group_id: Uuid,
        caller: Uuid,
        update: GroupUpdate,
    ) -> Result<(), DomainError> {
        self.observe(DomainCall::UpdateGroup {
            group_id,
            caller,
            update,
        })
    }

    async fn delete_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError> {
        self.observe(DomainCall::DeleteGroup { group_id, caller })
    }

    async fn join_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError> {
        self.observe(DomainCall::JoinGroup { group_id, caller })
    }

    async fn leave_group(&self, group_id: Uuid, caller: Uuid) -> Result<(), DomainError> {
        self.observe(DomainCall::LeaveGroup { group_id, caller })
    }

    async fn add_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.observe(DomainCall::AddGroupUsers {
            caller,
            group_id,
            user_ids,
        })
    }

    async fn kick_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.observe(DomainCall::KickGroupUsers {
            caller,
            group_id,
            user_ids,
        })
    }

    async fn promote_group_users(
        &self,
        caller: Uuid,
        group_id: Uuid,
        user_ids: Vec<Uuid>,
    ) -> Result<(), DomainError> {
        self.observe(DomainCall::PromoteGroupUsers {
            caller,
            group_id,
            user_ids,
        })
    }

    async fn list_group_users(
        &self,
        group_id: Uuid,
        presence: &dyn PresenceTracker,
    ) -> Result<GroupUserList, DomainError> {
        self.observe(DomainCall::ListGroupUsers { group_id })?;
        Ok(GroupUserList {
            group_users: vec![GroupUser {
                user: User {
                    id: self.member,
                    username: "member".to_string(),
                    display_name: String::new(),
                    avatar_url: String::new(),
                    lang_tag: "en".to_string(),
                    online: presence.is_online(self.member),
                },
                state: GroupMembershipState::Superadmin,
            }],
        })
    }

    async fn list_user_groups(&self, user_id: Uuid) -> Result<UserGroupList, DomainError> {
        self.observe(DomainCall::ListUserGroups { user_id })?;
        Ok(UserGroupList::default())
    }

    async fn list_groups(
        &self,
        name: Option<String>,
        limit: u32,
        cursor: Option<String>,
    ) -> Result<GroupList, DomainError> {
        self.observe(DomainCall::ListGroups {
            name,
            limit,
            cursor,
        })?;
        Ok(GroupList::default())
    }
}

/// Presence tracker that reports everyone online.
pub struct EveryoneOnline;

impl PresenceTracker for EveryoneOnline {
    fn is_online(&self, _user_id: Uuid) -> bool {
        true
    }
}

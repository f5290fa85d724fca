//! Group API pipeline orchestrator.
//!
//! Every entry point runs the same sequence through [`GroupApi::execute`]:
//! validate, before-hook, domain call, error translation, after-hook. The
//! operation descriptors in [`crate::service::ops`] supply the parts that
//! differ.

use std::sync::Arc;
use std::time::Instant;

use groupgate_core::messages::{
    AddGroupUsersRequest, CreateGroupRequest, DeleteGroupRequest, Empty, Group, GroupList,
    GroupUserList, JoinGroupRequest, KickGroupUsersRequest, LeaveGroupRequest,
    ListGroupUsersRequest, ListGroupsRequest, ListUserGroupsRequest, PromoteGroupUsersRequest,
    UpdateGroupRequest, UserGroupList,
};
use groupgate_core::{IdentityContext, Status, StatusCode};
use tracing::{info_span, Instrument};

use crate::hooks::invoke::{invoke_after, invoke_before, Invocation};
use crate::hooks::HookRegistry;
use crate::service::config::ApiConfig;
use crate::service::operation::{ApiOperation, DispatchContext};
use crate::service::ops::{
    AddGroupUsers, CreateGroup, DeleteGroup, JoinGroup, KickGroupUsers, LeaveGroup,
    ListGroupUsers, ListGroups, ListUserGroups, PromoteGroupUsers, UpdateGroup,
};
use crate::service::validate::Validated;
use crate::telemetry::{Direction, MetricsFacade, MetricsSink};
use crate::traits::{GroupDomain, NoPresence, PresenceTracker};

/// Pipeline stage a request was in when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Validating,
    BeforeHook,
    Dispatching,
}

impl Stage {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::BeforeHook => "before_hook",
            Self::Dispatching => "dispatching",
        }
    }

    fn fail(self) -> impl FnOnce(Status) -> (Stage, Status) {
        move |status| (self, status)
    }
}

// ---------------------------------------------------------------------------
// GroupApi
// ---------------------------------------------------------------------------

/// Hook-augmented group API.
///
/// Cheap to share: every collaborator sits behind an `Arc`, and the hook
/// registry is read without locking.
#[derive(Clone)]
pub struct GroupApi {
    config: Arc<ApiConfig>,
    hooks: Arc<HookRegistry>,
    domain: Arc<dyn GroupDomain>,
    presence: Arc<dyn PresenceTracker>,
    metrics: Arc<dyn MetricsSink>,
}

impl GroupApi {
    /// Creates an API with no presence tracking that reports measurements
    /// through the `metrics` facade.
    #[must_use]
    pub fn new(
        config: Arc<ApiConfig>,
        hooks: Arc<HookRegistry>,
        domain: Arc<dyn GroupDomain>,
    ) -> Self {
        Self {
            config,
            hooks,
            domain,
            presence: Arc::new(NoPresence),
            metrics: Arc::new(MetricsFacade),
        }
    }

    #[must_use]
    pub fn with_presence(mut self, presence: Arc<dyn PresenceTracker>) -> Self {
        self.presence = presence;
        self
    }

    #[must_use]
    pub fn with_metrics_sink(mut self, metrics: Arc<dyn MetricsSink>) -> Self {
        self.metrics = metrics;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    #[must_use]
    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Runs one request for operation `O` through the full pipeline.
    ///
    /// Produces exactly one of a response or a status.
    ///
    /// # Errors
    ///
    /// `INVALID_ARGUMENT` from validation, the before-hook's own status when
    /// it rejects, `INTERNAL` for hook contract violations, or the translated
    /// domain error.
    pub async fn execute<O: ApiOperation>(
        &self,
        identity: &IdentityContext,
        request: O::Request,
    ) -> Result<O::Response, Status> {
        let span = info_span!(
            "api_request",
            operation = O::NAME,
            user_id = %identity.user_id,
            client = %identity.client_addr,
            failed_stage = tracing::field::Empty,
        );

        async move {
            match self.run::<O>(identity, request).await {
                Ok(response) => Ok(response),
                Err((stage, status)) => {
                    tracing::Span::current().record("failed_stage", stage.as_str());
                    if status.code == StatusCode::Internal {
                        tracing::warn!(
                            stage = stage.as_str(),
                            message = %status.message,
                            "request failed"
                        );
                    } else {
                        tracing::debug!(
                            stage = stage.as_str(),
                            code = %status.code,
                            message = %status.message,
                            "request failed"
                        );
                    }
                    Err(status)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn run<O: ApiOperation>(
        &self,
        identity: &IdentityContext,
        request: O::Request,
    ) -> Result<O::Response, (Stage, Status)> {
        let inv = Invocation {
            operation: O::NAME,
            identity,
            config: &self.config,
            sink: self.metrics.as_ref(),
        };

        let params = match O::validate(&request, &self.config).map_err(Stage::Validating.fail())? {
            Validated::Proceed(params) => params,
            Validated::Complete(response) => return Ok(response),
        };

        let params = match self.hooks.before::<O>() {
            None => params,
            Some(hook) => {
                let request = invoke_before(hook, inv, request)
                    .await
                    .map_err(Stage::BeforeHook.fail())?;
                // Parameters must come from the request the hook handed back.
                match O::validate(&request, &self.config).map_err(Stage::Validating.fail())? {
                    Validated::Proceed(params) => params,
                    Validated::Complete(response) => return Ok(response),
                }
            }
        };

        let ctx = DispatchContext {
            domain: self.domain.as_ref(),
            presence: self.presence.as_ref(),
            identity,
        };
        let call_span = info_span!("api_call", function = %inv.name(Direction::Call));
        let start = Instant::now();
        let outcome = O::dispatch(ctx, params).instrument(call_span).await;
        inv.measure(Direction::Call, start.elapsed());

        let response = outcome.map_err(|err| (Stage::Dispatching, O::errors().translate(&err)))?;

        if let Some(hook) = self.hooks.after::<O>() {
            invoke_after(hook, inv, &response).await;
        }
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// One entry point per operation. Each returns the operation's response or
/// the status produced by the pipeline (see [`GroupApi::execute`]).
#[allow(clippy::missing_errors_doc)]
impl GroupApi {
    pub async fn create_group(
        &self,
        identity: &IdentityContext,
        request: CreateGroupRequest,
    ) -> Result<Group, Status> {
        self.execute::<CreateGroup>(identity, request).await
    }

    pub async fn update_group(
        &self,
        identity: &IdentityContext,
        request: UpdateGroupRequest,
    ) -> Result<Empty, Status> {
        self.execute::<UpdateGroup>(identity, request).await
    }

    pub async fn delete_group(
        &self,
        identity: &IdentityContext,
        request: DeleteGroupRequest,
    ) -> Result<Empty, Status> {
        self.execute::<DeleteGroup>(identity, request).await
    }

    pub async fn join_group(
        &self,
        identity: &IdentityContext,
        request: JoinGroupRequest,
    ) -> Result<Empty, Status> {
        self.execute::<JoinGroup>(identity, request).await
    }

    pub async fn leave_group(
        &self,
        identity: &IdentityContext,
        request: LeaveGroupRequest,
    ) -> Result<Empty, Status> {
        self.execute::<LeaveGroup>(identity, request).await
    }

    pub async fn add_group_users(
        &self,
        identity: &IdentityContext,
        request: AddGroupUsersRequest,
    ) -> Result<Empty, Status> {
        self.execute::<AddGroupUsers>(identity, request).await
    }

    pub async fn kick_group_users(
        &self,
        identity: &IdentityContext,
        request: KickGroupUsersRequest,
    ) -> Result<Empty, Status> {
        self.execute::<KickGroupUsers>(identity, request).await
    }

    pub async fn promote_group_users(
        &self,
        identity: &IdentityContext,
        request: PromoteGroupUsersRequest,
    ) -> Result<Empty, Status> {
        self.execute::<PromoteGroupUsers>(identity, request).await
    }

    pub async fn list_group_users(
        &self,
        identity: &IdentityContext,
        request: ListGroupUsersRequest,
    ) -> Result<GroupUserList, Status> {
        self.execute::<ListGroupUsers>(identity, request).await
    }

    pub async fn list_user_groups(
        &self,
        identity: &IdentityContext,
        request: ListUserGroupsRequest,
    ) -> Result<UserGroupList, Status> {
        self.execute::<ListUserGroups>(identity, request).await
    }

    pub async fn list_groups(
        &self,
        identity: &IdentityContext,
        request: ListGroupsRequest,
    ) -> Result<GroupList, Status> {
        self.execute::<ListGroups>(identity, request).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use groupgate_core::messages::GroupMembershipState;
    use uuid::Uuid;

    use super::*;
    use crate::hooks::{after_fn, before_fn, HookRegistryBuilder, BEFORE_HOOK_NO_RESULT};
    use crate::testing::{identity, DomainCall, EveryoneOnline, FakeDomain, RecordingSink};
    use crate::traits::{NewGroup, Sentinel};

    struct Harness {
        api: GroupApi,
        domain: Arc<FakeDomain>,
        sink: Arc<RecordingSink>,
    }

    fn harness(domain: FakeDomain, hooks: HookRegistry) -> Harness {
        let domain = Arc::new(domain);
        let sink = Arc::new(RecordingSink::default());
        let api = GroupApi::new(
            Arc::new(ApiConfig::default()),
            Arc::new(hooks),
            domain.clone(),
        )
        .with_metrics_sink(sink.clone());
        Harness { api, domain, sink }
    }

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    fn assert_send<T: Send>(_: &T) {}

    /// Pass-through before and after hooks for `O` that bump `calls`.
    fn counted<O: ApiOperation>(
        builder: HookRegistryBuilder,
        calls: &Arc<AtomicUsize>,
    ) -> HookRegistryBuilder {
        let (before_seen, after_seen) = (Arc::clone(calls), Arc::clone(calls));
        builder
            .before::<O>(before_fn(move |_id: &IdentityContext, req: O::Request| {
                before_seen.fetch_add(1, Ordering::SeqCst);
                Ok(Some(req))
            }))
            .after::<O>(after_fn(move |_id: &IdentityContext, _resp: &O::Response| {
                after_seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
    }

    fn counting_hooks(calls: &Arc<AtomicUsize>) -> HookRegistry {
        let builder = HookRegistry::builder();
        let builder = counted::<CreateGroup>(builder, calls);
        let builder = counted::<UpdateGroup>(builder, calls);
        let builder = counted::<DeleteGroup>(builder, calls);
        let builder = counted::<JoinGroup>(builder, calls);
        let builder = counted::<LeaveGroup>(builder, calls);
        let builder = counted::<AddGroupUsers>(builder, calls);
        let builder = counted::<KickGroupUsers>(builder, calls);
        let builder = counted::<PromoteGroupUsers>(builder, calls);
        let builder = counted::<ListGroupUsers>(builder, calls);
        let builder = counted::<ListUserGroups>(builder, calls);
        counted::<ListGroups>(builder, calls).build()
    }

    // -- validation before hooks -------------------------------------------

    #[tokio::test]
    async fn missing_required_field_skips_hooks_for_every_operation() {
        let calls = counter();
        let h = harness(FakeDomain::default(), counting_hooks(&calls));
        let id = identity();
        let group_unset = || Status::invalid_argument("Group ID must be set.");

        let results = [
            (
                CreateGroup::NAME,
                h.api.create_group(&id, CreateGroupRequest::default()).await.err(),
                Status::invalid_argument("Group name must be set."),
            ),
            (
                UpdateGroup::NAME,
                h.api.update_group(&id, UpdateGroupRequest::default()).await.err(),
                group_unset(),
            ),
            (
                DeleteGroup::NAME,
                h.api.delete_group(&id, DeleteGroupRequest::default()).await.err(),
                group_unset(),
            ),
            (
                JoinGroup::NAME,
                h.api.join_group(&id, JoinGroupRequest::default()).await.err(),
                group_unset(),
            ),
            (
                LeaveGroup::NAME,
                h.api.leave_group(&id, LeaveGroupRequest::default()).await.err(),
                group_unset(),
            ),
            (
                AddGroupUsers::NAME,
                h.api.add_group_users(&id, AddGroupUsersRequest::default()).await.err(),
                group_unset(),
            ),
            (
                KickGroupUsers::NAME,
                h.api.kick_group_users(&id, KickGroupUsersRequest::default()).await.err(),
                group_unset(),
            ),
            (
                PromoteGroupUsers::NAME,
                h.api
                    .promote_group_users(&id, PromoteGroupUsersRequest::default())
                    .await
                    .err(),
                group_unset(),
            ),
            (
                ListGroupUsers::NAME,
                h.api.list_group_users(&id, ListGroupUsersRequest::default()).await.err(),
                group_unset(),
            ),
            (
                ListUserGroups::NAME,
                h.api.list_user_groups(&id, ListUserGroupsRequest::default()).await.err(),
                Status::invalid_argument("User ID must be set."),
            ),
            (
                ListGroups::NAME,
                h.api
                    .list_groups(
                        &id,
                        ListGroupsRequest {
                            limit: Some(0),
                            ..ListGroupsRequest::default()
                        },
                    )
                    .await
                    .err(),
                Status::invalid_argument("Invalid limit - limit must be between 1 and 100."),
            ),
        ];

        for (operation, err, expected) in results {
            assert_eq!(err, Some(expected), "{operation}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(h.domain.calls().is_empty());
        assert!(h.sink.take().is_empty());
    }

    #[tokio::test]
    async fn malformed_ids_name_the_field_for_every_operation() {
        let h = harness(FakeDomain::default(), HookRegistry::empty());
        let id = identity();
        let bad = || "not-a-uuid".to_string();
        let group_msg = Status::invalid_argument("Group ID must be a valid ID.");

        let results = [
            h.api
                .update_group(&id, UpdateGroupRequest { group_id: bad(), ..Default::default() })
                .await
                .unwrap_err(),
            h.api
                .delete_group(&id, DeleteGroupRequest { group_id: bad() })
                .await
                .unwrap_err(),
            h.api
                .join_group(&id, JoinGroupRequest { group_id: bad() })
                .await
                .unwrap_err(),
            h.api
                .leave_group(&id, LeaveGroupRequest { group_id: bad() })
                .await
                .unwrap_err(),
            h.api
                .add_group_users(&id, AddGroupUsersRequest { group_id: bad(), user_ids: vec![] })
                .await
                .unwrap_err(),
            h.api
                .kick_group_users(&id, KickGroupUsersRequest { group_id: bad(), user_ids: vec![] })
                .await
                .unwrap_err(),
            h.api
                .promote_group_users(
                    &id,
                    PromoteGroupUsersRequest { group_id: bad(), user_ids: vec![] },
                )
                .await
                .unwrap_err(),
            h.api
                .list_group_users(&id, ListGroupUsersRequest { group_id: bad() })
                .await
                .unwrap_err(),
        ];
        for err in results {
            assert_eq!(err, group_msg);
        }

        let err = h
            .api
            .list_user_groups(&id, ListUserGroupsRequest { user_id: bad() })
            .await
            .unwrap_err();
        assert_eq!(err, Status::invalid_argument("User ID must be a valid ID."));
        assert!(h.domain.calls().is_empty());
    }

    #[tokio::test]
    async fn empty_member_list_skips_hooks_and_dispatch_for_every_bulk_op() {
        let calls = counter();
        let h = harness(FakeDomain::default(), counting_hooks(&calls));
        let id = identity();
        let group_id = Uuid::new_v4().to_string();

        let responses = [
            (
                AddGroupUsers::NAME,
                h.api
                    .add_group_users(
                        &id,
                        AddGroupUsersRequest {
                            group_id: group_id.clone(),
                            user_ids: Vec::new(),
                        },
                    )
                    .await,
            ),
            (
                KickGroupUsers::NAME,
                h.api
                    .kick_group_users(
                        &id,
                        KickGroupUsersRequest {
                            group_id: group_id.clone(),
                            user_ids: Vec::new(),
                        },
                    )
                    .await,
            ),
            (
                PromoteGroupUsers::NAME,
                h.api
                    .promote_group_users(
                        &id,
                        PromoteGroupUsersRequest {
                            group_id,
                            user_ids: Vec::new(),
                        },
                    )
                    .await,
            ),
        ];

        for (operation, response) in responses {
            assert_eq!(response, Ok(Empty {}), "{operation}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(h.domain.calls().is_empty());
        assert!(h.sink.take().is_empty());
    }

    // -- before-hook contract ----------------------------------------------

    #[tokio::test]
    async fn replacement_request_reaches_domain() {
        let hooks = HookRegistry::builder()
            .before::<CreateGroup>(before_fn(
                |_id: &IdentityContext, _req: CreateGroupRequest| {
                    Ok(Some(CreateGroupRequest {
                        name: "B".to_string(),
                        lang_tag: "fr".to_string(),
                        ..CreateGroupRequest::default()
                    }))
                },
            ))
            .build();
        let h = harness(FakeDomain::default(), hooks);
        let caller = identity();

        let request = CreateGroupRequest {
            name: "A".to_string(),
            ..CreateGroupRequest::default()
        };
        let group = h.api.create_group(&caller, request).await.unwrap();
        assert_eq!(group.name, "B");

        let expected = DomainCall::CreateGroup {
            caller: caller.user_id,
            group: NewGroup {
                creator_id: caller.user_id,
                name: "B".to_string(),
                lang_tag: "fr".to_string(),
                description: String::new(),
                avatar_url: String::new(),
                metadata: String::new(),
                open: false,
                max_count: None,
            },
        };
        assert_eq!(h.domain.calls(), vec![expected]);
    }

    #[tokio::test]
    async fn replacement_with_new_limit_drives_listing() {
        let hooks = HookRegistry::builder()
            .before::<ListGroups>(before_fn(
                |_id: &IdentityContext, mut req: ListGroupsRequest| {
                    req.limit = Some(50);
                    req.name = Some("guild".to_string());
                    Ok(Some(req))
                },
            ))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        h.api
            .list_groups(&identity(), ListGroupsRequest::default())
            .await
            .unwrap();

        assert_eq!(
            h.domain.calls(),
            vec![DomainCall::ListGroups {
                name: Some("guild".to_string()),
                limit: 50,
                cursor: None,
            }]
        );
    }

    #[tokio::test]
    async fn invalid_replacement_is_rejected_without_dispatch() {
        let hooks = HookRegistry::builder()
            .before::<DeleteGroup>(before_fn(
                |_id: &IdentityContext, _req: DeleteGroupRequest| {
                    Ok(Some(DeleteGroupRequest {
                        group_id: "garbage".to_string(),
                    }))
                },
            ))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        let request = DeleteGroupRequest {
            group_id: Uuid::new_v4().to_string(),
        };
        let err = h.api.delete_group(&identity(), request).await.unwrap_err();
        assert_eq!(err, Status::invalid_argument("Group ID must be a valid ID."));
        assert!(h.domain.calls().is_empty());
        assert_eq!(h.sink.count(Direction::Before), 1);
    }

    #[tokio::test]
    async fn hook_rejection_is_returned_verbatim() {
        let hooks = HookRegistry::builder()
            .before::<JoinGroup>(before_fn(|_id: &IdentityContext, _req: JoinGroupRequest| {
                Err(Status::new(StatusCode::PermissionDenied, "Clan wars in progress."))
            }))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        let request = JoinGroupRequest {
            group_id: Uuid::new_v4().to_string(),
        };
        let err = h.api.join_group(&identity(), request).await.unwrap_err();

        assert_eq!(err.code, StatusCode::PermissionDenied);
        assert_eq!(err.message, "Clan wars in progress.");
        assert!(h.domain.calls().is_empty());
        assert_eq!(h.sink.count(Direction::Before), 1);
        assert_eq!(h.sink.count(Direction::Call), 0);
    }

    #[tokio::test]
    async fn hook_without_result_is_internal() {
        let after_calls = counter();
        let seen = after_calls.clone();
        let hooks = HookRegistry::builder()
            .before::<LeaveGroup>(before_fn(|_id: &IdentityContext, _req: LeaveGroupRequest| {
                Ok(None)
            }))
            .after::<LeaveGroup>(after_fn(move |_id: &IdentityContext, _resp: &Empty| {
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        let request = LeaveGroupRequest {
            group_id: Uuid::new_v4().to_string(),
        };
        let err = h.api.leave_group(&identity(), request).await.unwrap_err();

        assert_eq!(err, Status::internal(BEFORE_HOOK_NO_RESULT));
        assert!(h.domain.calls().is_empty());
        assert_eq!(after_calls.load(Ordering::SeqCst), 0);
    }

    // -- translation ---------------------------------------------------------

    #[tokio::test]
    async fn last_superadmin_leave_is_invalid_argument() {
        let h = harness(
            FakeDomain::failing(Sentinel::GroupLastSuperadmin),
            HookRegistry::empty(),
        );
        let request = LeaveGroupRequest {
            group_id: Uuid::new_v4().to_string(),
        };
        let err = h.api.leave_group(&identity(), request).await.unwrap_err();
        assert_eq!(
            err,
            Status::invalid_argument("Cannot leave group when you are the last superadmin.")
        );
        assert_eq!(h.domain.calls().len(), 1);
    }

    #[tokio::test]
    async fn unmapped_sentinel_is_internal() {
        let h = harness(FakeDomain::failing(Sentinel::GroupFull), HookRegistry::empty());
        let request = UpdateGroupRequest {
            group_id: Uuid::new_v4().to_string(),
            description: Some("d".to_string()),
            ..UpdateGroupRequest::default()
        };
        let err = h.api.update_group(&identity(), request).await.unwrap_err();
        assert_eq!(err, Status::internal("Error while trying to update group."));
    }

    #[tokio::test]
    async fn domain_failure_skips_after_hook_and_hides_detail() {
        let after_calls = counter();
        let seen = after_calls.clone();
        let hooks = HookRegistry::builder()
            .after::<ListUserGroups>(after_fn(
                move |_id: &IdentityContext, _resp: &UserGroupList| {
                    seen.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            ))
            .build();
        let h = harness(FakeDomain::failing_opaque("deadlock detected"), hooks);

        let request = ListUserGroupsRequest {
            user_id: Uuid::new_v4().to_string(),
        };
        let err = h.api.list_user_groups(&identity(), request).await.unwrap_err();

        assert_eq!(err, Status::internal("Error while trying to list groups for a user."));
        assert_eq!(after_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.sink.count(Direction::Call), 1);
    }

    // -- after-hook contract -------------------------------------------------

    #[tokio::test]
    async fn after_hook_failure_keeps_response() {
        let hooks = HookRegistry::builder()
            .after::<CreateGroup>(after_fn(|_id: &IdentityContext, _resp: &Group| {
                Err(anyhow::anyhow!("audit log unavailable"))
            }))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        let request = CreateGroupRequest {
            name: "keepers".to_string(),
            ..CreateGroupRequest::default()
        };
        let group = h.api.create_group(&identity(), request).await.unwrap();
        assert_eq!(group.name, "keepers");
        assert_eq!(h.sink.count(Direction::After), 1);
    }

    #[tokio::test]
    async fn after_hook_sees_committed_response() {
        let observed = Arc::new(parking_lot::Mutex::new(None));
        let slot = observed.clone();
        let hooks = HookRegistry::builder()
            .after::<CreateGroup>(after_fn(move |_id: &IdentityContext, resp: &Group| {
                *slot.lock() = Some(resp.id);
                Ok(())
            }))
            .build();
        let h = harness(FakeDomain::default(), hooks);

        let request = CreateGroupRequest {
            name: "scribes".to_string(),
            ..CreateGroupRequest::default()
        };
        let group = h.api.create_group(&identity(), request).await.unwrap();
        assert_eq!(*observed.lock(), Some(group.id));
    }

    // -- end to end ----------------------------------------------------------

    #[tokio::test]
    async fn create_with_empty_name_never_dispatches() {
        let h = harness(FakeDomain::default(), HookRegistry::empty());
        let err = h
            .api
            .create_group(&identity(), CreateGroupRequest::default())
            .await
            .unwrap_err();
        assert_eq!(err, Status::invalid_argument("Group name must be set."));
        assert!(h.domain.calls().is_empty());
    }

    #[tokio::test]
    async fn create_records_one_measurement_per_stage() {
        let hooks = HookRegistry::builder()
            .before::<CreateGroup>(before_fn(|_id: &IdentityContext, req: CreateGroupRequest| {
                Ok(Some(req))
            }))
            .after::<CreateGroup>(after_fn(|_id: &IdentityContext, _resp: &Group| Ok(())))
            .build();
        let h = harness(FakeDomain::default(), hooks);
        let caller = identity();

        let request = CreateGroupRequest {
            name: "wardens".to_string(),
            open: true,
            ..CreateGroupRequest::default()
        };
        let group = h.api.create_group(&caller, request).await.unwrap();
        assert_eq!(group.creator_id, caller.user_id);
        assert!(group.open);

        let names: Vec<(String, Direction)> = h
            .sink
            .take()
            .into_iter()
            .map(|m| (m.name, m.direction))
            .collect();
        assert_eq!(
            names,
            vec![
                (
                    "groupgate.api-before.Groupgate.CreateGroup".to_string(),
                    Direction::Before
                ),
                ("groupgate.api.Groupgate.CreateGroup".to_string(), Direction::Call),
                (
                    "groupgate.api-after.Groupgate.CreateGroup".to_string(),
                    Direction::After
                ),
            ]
        );
    }

    #[tokio::test]
    async fn bulk_ops_pass_caller_and_members_in_order() {
        let h = harness(FakeDomain::default(), HookRegistry::empty());
        let caller = identity();
        let group_id = Uuid::new_v4();
        let members = vec![Uuid::new_v4(), Uuid::new_v4()];
        let raw: Vec<String> = members.iter().map(Uuid::to_string).collect();

        h.api
            .kick_group_users(
                &caller,
                KickGroupUsersRequest {
                    group_id: group_id.to_string(),
                    user_ids: raw.clone(),
                },
            )
            .await
            .unwrap();
        h.api
            .promote_group_users(
                &caller,
                PromoteGroupUsersRequest {
                    group_id: group_id.to_string(),
                    user_ids: raw,
                },
            )
            .await
            .unwrap();

        assert_eq!(
            h.domain.calls(),
            vec![
                DomainCall::KickGroupUsers {
                    caller: caller.user_id,
                    group_id,
                    user_ids: members.clone(),
                },
                DomainCall::PromoteGroupUsers {
                    caller: caller.user_id,
                    group_id,
                    user_ids: members,
                },
            ]
        );
    }

    #[tokio::test]
    async fn member_listing_uses_configured_presence() {
        let domain = Arc::new(FakeDomain::default());
        let api = GroupApi::new(
            Arc::new(ApiConfig::default()),
            Arc::new(HookRegistry::empty()),
            domain.clone(),
        )
        .with_presence(Arc::new(EveryoneOnline))
        .with_metrics_sink(Arc::new(RecordingSink::default()));

        let request = ListGroupUsersRequest {
            group_id: Uuid::new_v4().to_string(),
        };
        let list = api.list_group_users(&identity(), request).await.unwrap();

        assert_eq!(list.group_users.len(), 1);
        assert_eq!(list.group_users[0].user.id, domain.member);
        assert!(list.group_users[0].user.online);
        assert_eq!(list.group_users[0].state, GroupMembershipState::Superadmin);
    }

    #[tokio::test]
    async fn page_size_bounds_are_enforced() {
        let h = harness(FakeDomain::default(), HookRegistry::empty());
        let id = identity();
        for (limit, ok) in [(0, false), (1, true), (100, true), (101, false)] {
            let request = ListGroupsRequest {
                limit: Some(limit),
                ..ListGroupsRequest::default()
            };
            let result = h.api.list_groups(&id, request).await;
            assert_eq!(result.is_ok(), ok, "limit {limit}");
        }
        assert_eq!(h.domain.calls().len(), 2);
    }

    #[tokio::test]
    async fn concurrent_requests_share_one_registry() {
        let hooks = HookRegistry::builder()
            .before::<JoinGroup>(before_fn(|_id: &IdentityContext, req: JoinGroupRequest| {
                Ok(Some(req))
            }))
            .build();
        let h = harness(FakeDomain::default(), hooks);
        let api = Arc::new(h.api);

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let api = Arc::clone(&api);
            tasks.push(tokio::spawn(async move {
                let request = JoinGroupRequest {
                    group_id: Uuid::new_v4().to_string(),
                };
                api.join_group(&identity(), request).await
            }));
        }
        for task in tasks {
            task.await.unwrap().unwrap();
        }
        assert_eq!(h.domain.calls().len(), 16);
        assert_eq!(h.sink.count(Direction::Before), 16);
    }

    #[test]
    fn pipeline_future_is_send() {
        let h = harness(FakeDomain::default(), HookRegistry::empty());
        let id = identity();
        let fut = h.api.list_groups(&id, ListGroupsRequest::default());
        assert_send(&fut);
    }
}

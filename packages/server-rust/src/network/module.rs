//! Network module with deferred startup lifecycle.
//!
//! `new()` captures configuration and the API, `start()` binds the TCP
//! listener, and `serve()` accepts connections until the shutdown future
//! resolves. The host can install its authentication layer on the router
//! returned by `build_router()` before serving.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use axum::routing::{get, post, put};
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use super::config::NetworkConfig;
use super::handlers::{groups, healthcheck_handler, AppState};
use super::middleware::build_http_layers;
use crate::service::GroupApi;

/// Every method routed by [`NetworkModule::build_router`]. CORS admits
/// exactly these.
pub const SERVED_METHODS: &[Method] = &[Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Owns the HTTP server lifecycle for the group API.
pub struct NetworkModule {
    config: NetworkConfig,
    api: Arc<GroupApi>,
    listener: Option<TcpListener>,
}

impl NetworkModule {
    /// Creates a network module without binding any port.
    #[must_use]
    pub fn new(config: NetworkConfig, api: Arc<GroupApi>) -> Self {
        Self {
            config,
            api,
            listener: None,
        }
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /healthcheck`
    /// - `POST /v2/group`, `GET /v2/group` (list/search)
    /// - `PUT|DELETE /v2/group/{group_id}`
    /// - `POST /v2/group/{group_id}/{join,leave,add,kick,promote}`
    /// - `GET /v2/group/{group_id}/user`
    /// - `GET /v2/user/{user_id}/group`
    pub fn build_router(&self) -> Router {
        let state = AppState {
            api: Arc::clone(&self.api),
            start_time: Instant::now(),
        };

        Router::new()
            .route("/healthcheck", get(healthcheck_handler))
            .route(
                "/v2/group",
                post(groups::create_group).get(groups::list_groups),
            )
            .route(
                "/v2/group/{group_id}",
                put(groups::update_group).delete(groups::delete_group),
            )
            .route("/v2/group/{group_id}/join", post(groups::join_group))
            .route("/v2/group/{group_id}/leave", post(groups::leave_group))
            .route("/v2/group/{group_id}/add", post(groups::add_group_users))
            .route("/v2/group/{group_id}/kick", post(groups::kick_group_users))
            .route(
                "/v2/group/{group_id}/promote",
                post(groups::promote_group_users),
            )
            .route("/v2/group/{group_id}/user", get(groups::list_group_users))
            .route("/v2/user/{user_id}/group", get(groups::list_user_groups))
            .layer(build_http_layers(&self.config, SERVED_METHODS))
            .with_state(state)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the bound port, which differs from the configured one when
    /// port 0 is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!(host = %self.config.host, port, "TCP listener bound");

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves `router` until `shutdown` resolves, then lets in-flight
    /// requests finish.
    ///
    /// # Errors
    ///
    /// Returns an error if `start()` was not called first or the server
    /// hits a fatal I/O error.
    pub async fn serve(
        self,
        router: Router,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let listener = self
            .listener
            .ok_or_else(|| anyhow::anyhow!("start() must be called before serve()"))?;

        info!(hooks = self.api.hooks().len(), "serving group API");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("group API stopped");
        Ok(())
    }
}

//! HTTP server and router for the initiatives API

use super::handler::*;
use crate::config::ServerConfig;
use crate::repository::{CachedRepository, FileRepository, InitiativeRepository};
use crate::services::Services;
use crate::storage::{FileStore, KeyValueStore, LocalStorage, MemoryStore, StorageResult};
use crate::users::UserStore;
use axum::routing::{get, post};
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn InitiativeRepository>,
    pub users: Arc<UserStore>,
    pub services: Services,
    /// Fixed enhancement reference instant; `None` means start of the current UTC day
    pub reference: Option<DateTime<Utc>>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn InitiativeRepository>,
        users: Arc<UserStore>,
        services: Services,
    ) -> Self {
        Self {
            repository,
            users,
            services,
            reference: None,
        }
    }

    /// Build the state described by `config`: flat files under `data_dir`,
    /// buckets on disk or in memory, and the cache-or-fetch repository.
    pub fn from_config(config: &ServerConfig) -> StorageResult<Self> {
        let backend: Arc<dyn KeyValueStore> = match (&config.storage_dir, config.storage_quota_bytes) {
            (Some(dir), _) => Arc::new(FileStore::open(dir)?),
            (None, Some(limit)) => Arc::new(MemoryStore::with_quota(limit)),
            (None, None) => Arc::new(MemoryStore::new()),
        };
        let services = Services::new(LocalStorage::new(backend));

        // Another process may have edited the file since the last run
        services.cache.clear();

        let repository = CachedRepository::new(
            FileRepository::new(config.challenges_path()),
            services.cache.clone(),
        );
        Ok(Self::new(
            Arc::new(repository),
            Arc::new(UserStore::new(config.users_path())),
            services,
        ))
    }

    pub fn with_reference(mut self, reference: DateTime<Utc>) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Instant the enhancement pipeline offsets dates from. Stable for a
    /// whole day so repeated requests agree.
    pub fn reference(&self) -> DateTime<Utc> {
        self.reference.unwrap_or_else(|| {
            Utc::now()
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .map(|midnight| midnight.and_utc())
                .unwrap_or_else(Utc::now)
        })
    }
}

/// All API routes bound to `state`
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/status", get(status_handler))
        .route("/api/challenges", get(list_challenges).post(create_challenge))
        .route("/api/challenges/:uid", axum::routing::put(update_challenge))
        .route("/api/initiatives", get(list_initiatives))
        .route("/api/initiatives/facets", get(facets_handler))
        .route("/api/initiatives/summary", get(summary_handler))
        .route("/api/initiatives/:uid", get(get_initiative))
        .route("/api/initiatives/:uid/support", post(support_initiative))
        .route("/api/initiatives/:uid/donate", post(donate_initiative))
        .route("/api/initiatives/:uid/collaboration", get(get_collaboration))
        .route("/api/initiatives/:uid/comments", post(add_comment))
        .route("/api/initiatives/:uid/watch", post(toggle_watch))
        .route("/api/metrics/history", get(metrics_history))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/:id", get(get_user))
        .route("/api/notifications", get(list_notifications))
        .route("/api/notifications/read-all", post(mark_all_notifications_read))
        .route("/api/notifications/:id/read", post(mark_notification_read))
        .route("/api/preferences", get(get_preferences).put(put_preferences))
        .route("/api/layout", get(get_layout).put(put_layout))
        .with_state(state)
}

/// HTTP server for the initiatives API
pub struct HttpServer {
    config: ServerConfig,
    state: AppState,
}

impl HttpServer {
    pub fn new(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Bind and serve until the process is stopped
    pub async fn start(self) -> std::io::Result<()> {
        let mut app = router(self.state);
        if self.config.cors_permissive {
            app = app.layer(CorsLayer::permissive());
        }

        let addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        info!("Initiatives API listening on http://{}", addr);

        axum::serve(listener, app).await
    }
}

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use common_connect_jwt::{AuthTransport, ConfigStore};

use crate::config::AddonConfig;
use crate::descriptor::{atlassian_connect, INSTALLED_PATH, ISSUE_EVENT_PATH, UNINSTALLED_PATH};
use crate::events::handle_issue_event;
use crate::lifecycle::{installed, uninstalled};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AddonConfig>,
    pub store: ConfigStore,
    pub transport: AuthTransport,
}

impl AppState {
    /// State whose transport signs with whatever credentials `store` holds.
    pub fn new(config: AddonConfig, store: ConfigStore) -> Self {
        let transport = AuthTransport::new(store.clone());
        Self {
            config: Arc::new(config),
            store,
            transport,
        }
    }

    pub fn with_transport(mut self, transport: AuthTransport) -> Self {
        self.transport = transport;
        self
    }
}

async fn health() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/atlassian-connect.json", get(atlassian_connect))
        .route(INSTALLED_PATH, post(installed))
        .route(UNINSTALLED_PATH, post(uninstalled))
        .route(ISSUE_EVENT_PATH, post(handle_issue_event))
        .with_state(state)
}

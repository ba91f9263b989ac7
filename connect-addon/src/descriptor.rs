use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::config::AddonConfig;

pub const INSTALLED_PATH: &str = "/installed";
pub const UNINSTALLED_PATH: &str = "/uninstalled";
pub const ISSUE_EVENT_PATH: &str = "/issue_event";

/// Add-on descriptor served at `/atlassian-connect.json`.
pub fn descriptor(config: &AddonConfig) -> Value {
    json!({
        "key": config.key,
        "name": config.name,
        "description": "Example add-on calling the platform with JWT-signed requests",
        "baseUrl": config.base_url,
        "authentication": { "type": "jwt" },
        "lifecycle": {
            "installed": INSTALLED_PATH,
            "uninstalled": UNINSTALLED_PATH
        },
        "scopes": ["READ"],
        "apiVersion": 1,
        "modules": {
            "webhooks": [
                { "event": "jira:issue_created", "url": ISSUE_EVENT_PATH },
                { "event": "jira:issue_updated", "url": ISSUE_EVENT_PATH }
            ]
        }
    })
}

pub async fn atlassian_connect(State(state): State<AppState>) -> Json<Value> {
    Json(descriptor(&state.config))
}

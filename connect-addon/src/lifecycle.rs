use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use common_connect_jwt::Config;
use serde::Deserialize;
use tracing::info;

use crate::app::AppState;
use crate::error::AddonError;

/// Payload the platform posts to the `installed` lifecycle hook.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityContext {
    pub key: String,
    pub client_key: String,
    #[serde(default)]
    pub public_key: Option<String>,
    #[serde(default)]
    pub shared_secret: String,
    #[serde(default)]
    pub server_version: Option<String>,
    #[serde(default)]
    pub plugins_version: Option<String>,
    pub base_url: String,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
}

impl SecurityContext {
    fn into_config(self) -> Result<Config, AddonError> {
        if self.key.trim().is_empty() {
            return Err(AddonError::BadRequest("key is required".to_string()));
        }
        if self.shared_secret.is_empty() {
            return Err(AddonError::BadRequest("sharedSecret is required".to_string()));
        }
        if self.base_url.trim().is_empty() {
            return Err(AddonError::BadRequest("baseUrl is required".to_string()));
        }
        Ok(Config::new(
            self.key,
            self.client_key,
            self.shared_secret,
            self.base_url,
        ))
    }
}

pub async fn installed(
    State(state): State<AppState>,
    Json(context): Json<SecurityContext>,
) -> Result<Json<Vec<&'static str>>, AddonError> {
    let product = context.product_type.clone().unwrap_or_default();
    let config = context.into_config()?;
    info!(
        client_key = %config.client_key,
        base_url = %config.base_url,
        product = %product,
        "add-on installed"
    );
    state.store.publish(config);
    Ok(Json(vec!["OK"]))
}

pub async fn uninstalled(State(state): State<AppState>) -> StatusCode {
    if let Some(previous) = state.store.clear() {
        info!(client_key = %previous.client_key, "add-on uninstalled");
    }
    StatusCode::OK
}

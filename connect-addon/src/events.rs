use axum::extract::State;
use axum::http::header::ACCEPT;
use axum::Json;
use bytes::Bytes;
use common_connect_jwt::ConnectError;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::app::AppState;
use crate::error::AddonError;

/// Subset of the issue webhook payload this add-on reads.
#[derive(Debug, Deserialize)]
pub struct IssueEvent {
    #[serde(default)]
    pub timestamp: i64,
    #[serde(rename = "webhookEvent", default)]
    pub webhook_event: String,
    #[serde(default)]
    pub issue_event_type_name: Option<String>,
    pub issue: IssueRef,
}

#[derive(Debug, Deserialize)]
pub struct IssueRef {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "self", default)]
    pub self_url: String,
    pub key: String,
}

pub async fn handle_issue_event(
    State(state): State<AppState>,
    Json(event): Json<IssueEvent>,
) -> Result<Json<Vec<&'static str>>, AddonError> {
    let issue_key = event.issue.key.trim();
    if !is_issue_key(issue_key) {
        return Err(AddonError::BadRequest(format!(
            "invalid issue key '{}'",
            event.issue.key
        )));
    }

    // One snapshot for both the URL and the signature.
    let installed = state.store.load().ok_or(ConnectError::MissingConfiguration)?;
    let transport = state.transport.rebind(installed.clone());
    let url = format!(
        "{}/rest/api/2/issue/{issue_key}",
        installed.base_url.trim_end_matches('/')
    );
    let request = axum::http::Request::get(url)
        .header(ACCEPT, "application/json")
        .body(Bytes::new())
        .map_err(|err| AddonError::BadRequest(err.to_string()))?;

    let response = transport.send(&request).await?;
    if !response.status().is_success() {
        warn!(status = ?response.status(), issue_key, "issue lookup failed");
        return Err(AddonError::Upstream(format!(
            "issue lookup returned status {}",
            response.status()
        )));
    }

    let issue: Value = serde_json::from_slice(response.body())
        .map_err(|err| AddonError::Upstream(err.to_string()))?;
    info!(
        issue_key,
        webhook_event = %event.webhook_event,
        event_type = event.issue_event_type_name.as_deref().unwrap_or_default(),
        issue = %issue,
        "fetched issue for webhook event"
    );
    Ok(Json(vec!["OK"]))
}

/// `PROJECT-123`: a letter, then letters, digits or `_`, a dash and a number.
fn is_issue_key(key: &str) -> bool {
    let Some((project, number)) = key.rsplit_once('-') else {
        return false;
    };
    project.starts_with(|c: char| c.is_ascii_alphabetic())
        && project.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !number.is_empty()
        && number.chars().all(|c| c.is_ascii_digit())
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed validity window of every token, in seconds.
pub const TOKEN_LIFETIME_SECONDS: i64 = 180;

/// Claims carried by an Atlassian Connect JWT.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub qsh: String,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    /// Claims issued now for `issuer`, bound to `qsh`.
    pub fn new(issuer: impl Into<String>, qsh: impl Into<String>) -> Self {
        Self::issued_at(issuer, qsh, Utc::now())
    }

    pub fn issued_at(
        issuer: impl Into<String>,
        qsh: impl Into<String>,
        issued_at: DateTime<Utc>,
    ) -> Self {
        let expires_at = issued_at + Duration::seconds(TOKEN_LIFETIME_SECONDS);
        Self {
            qsh: qsh.into(),
            iss: issuer.into(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        }
    }
}

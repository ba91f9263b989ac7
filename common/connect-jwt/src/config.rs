use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use http::Request;
use serde::{Deserialize, Serialize};

use crate::claims::Claims;
use crate::error::{ConnectError, ConnectResult};
use crate::qsh;
use crate::signer::sign;
use crate::transport::{set_jwt_header, AuthSetter, AuthTransport};

/// Credentials exchanged with the host platform during installation.
///
/// The field names match the installation payload (`key`, `clientKey`,
/// `sharedSecret`, `baseUrl`), so the struct can be read straight from it.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// App key from the add-on descriptor, used as the token issuer.
    pub key: String,
    /// Identifier the platform assigned to this installation.
    pub client_key: String,
    /// HMAC secret for outgoing tokens.
    pub shared_secret: String,
    /// Address of the platform instance, possibly with a path prefix.
    pub base_url: String,
}

impl Config {
    pub fn new(
        key: impl Into<String>,
        client_key: impl Into<String>,
        shared_secret: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            client_key: client_key.into(),
            shared_secret: shared_secret.into(),
            base_url: base_url.into(),
        }
    }

    /// True once a secret is present; an incomplete config cannot sign.
    pub fn can_sign(&self) -> bool {
        !self.shared_secret.is_empty()
    }

    /// Path prefix of [`Config::base_url`] that is stripped before hashing.
    pub fn base_path(&self) -> String {
        qsh::base_path(&self.base_url)
    }

    /// Canonical path of `request` relative to the platform base URL.
    pub fn path<B>(&self, request: &Request<B>) -> String {
        qsh::canonical_path(request.uri().path(), &self.base_path())
    }

    /// Query string hash of `request`.
    pub fn qsh<B>(&self, request: &Request<B>) -> String {
        let uri = request.uri();
        qsh::query_string_hash(
            request.method().as_str(),
            uri.path(),
            uri.query(),
            &self.base_path(),
        )
    }

    /// Fresh claims issued by this add-on for `qsh`.
    pub fn claims(&self, qsh: impl Into<String>) -> Claims {
        Claims::new(self.key.clone(), qsh)
    }

    /// Signed token bound to `request`.
    pub fn token<B>(&self, request: &Request<B>) -> ConnectResult<String> {
        let claims = self.claims(self.qsh(request));
        sign(&claims, self.shared_secret.as_bytes())
    }

    /// Transport that signs every request with this config.
    pub fn transport(&self) -> AuthTransport {
        AuthTransport::new(self.clone())
    }
}

impl AuthSetter for Config {
    fn set_auth_header(&self, request: &mut Request<Bytes>) -> ConnectResult<()> {
        let token = self.token(request)?;
        set_jwt_header(request, &token)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key)
            .field("client_key", &self.client_key)
            .field("shared_secret", &"***redacted***")
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Read-mostly holder for the current [`Config`].
///
/// Readers take a snapshot; installs and uninstalls replace the snapshot as a
/// whole, so in-flight requests never see a half-updated config.
#[derive(Clone, Default)]
pub struct ConfigStore {
    inner: Arc<RwLock<Option<Arc<Config>>>>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        let store = Self::new();
        store.publish(config);
        store
    }

    pub fn load(&self) -> Option<Arc<Config>> {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard.clone()
    }

    pub fn publish(&self, config: Config) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(config));
    }

    pub fn clear(&self) -> Option<Arc<Config>> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.take()
    }

    pub fn is_configured(&self) -> bool {
        self.load().is_some()
    }
}

impl AuthSetter for ConfigStore {
    fn set_auth_header(&self, request: &mut Request<Bytes>) -> ConnectResult<()> {
        let config = self.load().ok_or(ConnectError::MissingConfiguration)?;
        config.set_auth_header(request)
    }
}

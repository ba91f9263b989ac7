use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

use crate::claims::Claims;
use crate::error::{ConnectError, ConnectResult};

/// HS256 signer keyed by the add-on's shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    key: EncodingKey,
}

impl TokenSigner {
    pub fn new(shared_secret: &[u8]) -> ConnectResult<Self> {
        if shared_secret.is_empty() {
            return Err(ConnectError::Signing("shared secret is empty".to_string()));
        }
        Ok(Self {
            key: EncodingKey::from_secret(shared_secret),
        })
    }

    /// Compact `header.payload.signature` token for `claims`.
    pub fn sign(&self, claims: &Claims) -> ConnectResult<String> {
        let header = Header::new(Algorithm::HS256);
        let token = encode(&header, claims, &self.key)?;
        Ok(token)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("key", &"***redacted***")
            .finish()
    }
}

/// One-shot signing of `claims` with `shared_secret`.
pub fn sign(claims: &Claims, shared_secret: &[u8]) -> ConnectResult<String> {
    TokenSigner::new(shared_secret)?.sign(claims)
}

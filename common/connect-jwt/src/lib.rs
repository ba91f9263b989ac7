pub mod claims;
pub mod config;
pub mod error;
pub mod qsh;
pub mod signer;
pub mod transport;

pub use claims::{Claims, TOKEN_LIFETIME_SECONDS};
pub use config::{Config, ConfigStore};
pub use error::{ConnectError, ConnectResult};
pub use qsh::{canonical_path, canonical_query, canonical_request, query_string_hash};
pub use signer::{sign, TokenSigner};
pub use transport::{
    clone_request, default_transport, normalize_uri, AuthSetter, AuthTransport, ReqwestTransport,
    Transport, AUTHORIZATION_SCHEME,
};

use thiserror::Error;

pub type ConnectResult<T> = Result<T, ConnectError>;

#[derive(Debug, Error)]
pub enum ConnectError {
    #[error("no add-on configuration bound to the transport")]
    MissingConfiguration,
    #[error("failed to sign token: {0}")]
    Signing(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

impl From<jsonwebtoken::errors::Error> for ConnectError {
    fn from(value: jsonwebtoken::errors::Error) -> Self {
        Self::Signing(value.to_string())
    }
}

impl From<http::Error> for ConnectError {
    fn from(value: http::Error) -> Self {
        Self::InvalidRequest(value.to_string())
    }
}

impl From<reqwest::Error> for ConnectError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(Box::new(value))
    }
}

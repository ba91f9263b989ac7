use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::AUTHORIZATION;
use http::{HeaderValue, Request, Response, Uri};
use once_cell::sync::Lazy;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::error::{ConnectError, ConnectResult};

/// Scheme prefix of the `Authorization` header value.
pub const AUTHORIZATION_SCHEME: &str = "JWT";

static DEFAULT_TRANSPORT: Lazy<Arc<dyn Transport>> =
    Lazy::new(|| Arc::new(ReqwestTransport::default()) as Arc<dyn Transport>);

/// Anything that can attach an `Authorization` header to a request.
pub trait AuthSetter: Send + Sync {
    fn set_auth_header(&self, request: &mut Request<Bytes>) -> ConnectResult<()>;
}

impl<T> AuthSetter for Arc<T>
where
    T: AuthSetter + ?Sized,
{
    fn set_auth_header(&self, request: &mut Request<Bytes>) -> ConnectResult<()> {
        (**self).set_auth_header(request)
    }
}

/// Sends a fully formed request and returns the response untouched.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request<Bytes>) -> ConnectResult<Response<Bytes>>;
}

/// Shared reqwest-backed transport used when no base is supplied.
pub fn default_transport() -> Arc<dyn Transport> {
    DEFAULT_TRANSPORT.clone()
}

#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: Request<Bytes>) -> ConnectResult<Response<Bytes>> {
        let request = reqwest::Request::try_from(request)
            .map_err(|err| ConnectError::InvalidRequest(err.to_string()))?;
        let response = self.client.execute(request).await?;

        let status = response.status();
        let version = response.version();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        let mut converted = Response::new(body);
        *converted.status_mut() = status;
        *converted.version_mut() = version;
        *converted.headers_mut() = headers;
        Ok(converted)
    }
}

/// Transport decorator that signs a copy of every request before sending it.
#[derive(Clone, Default)]
pub struct AuthTransport {
    auth: Option<Arc<dyn AuthSetter>>,
    base: Option<Arc<dyn Transport>>,
}

impl AuthTransport {
    pub fn new(auth: impl AuthSetter + 'static) -> Self {
        Self {
            auth: Some(Arc::new(auth)),
            base: None,
        }
    }

    /// Transport with no credentials bound; every send fails.
    pub fn unconfigured() -> Self {
        Self::default()
    }

    pub fn with_base(mut self, base: impl Transport + 'static) -> Self {
        self.base = Some(Arc::new(base));
        self
    }

    /// The transport requests are forwarded to.
    pub fn base(&self) -> Arc<dyn Transport> {
        match &self.base {
            Some(base) => base.clone(),
            None => default_transport(),
        }
    }

    pub fn uses_default_base(&self) -> bool {
        self.base.is_none()
    }

    /// Same base transport, signing with `auth` instead.
    pub fn rebind(&self, auth: impl AuthSetter + 'static) -> Self {
        Self {
            auth: Some(Arc::new(auth)),
            base: self.base.clone(),
        }
    }

    /// Sign a clone of `request` and forward it to the base transport.
    ///
    /// The caller's request is never modified.
    pub async fn send(&self, request: &Request<Bytes>) -> ConnectResult<Response<Bytes>> {
        let auth = self.auth.as_ref().ok_or(ConnectError::MissingConfiguration)?;

        let mut signed = clone_request(request);
        *signed.uri_mut() = normalize_uri(signed.uri())?;
        if let Err(err) = auth.set_auth_header(&mut signed) {
            warn!(
                method = %signed.method(),
                path = signed.uri().path(),
                error = %err,
                "failed to sign outgoing request"
            );
            return Err(err);
        }

        debug!(
            method = %signed.method(),
            path = signed.uri().path(),
            "forwarding signed request"
        );
        self.base().send(signed).await
    }

    /// Convenience `GET` of an absolute URL.
    pub async fn get(&self, url: &str) -> ConnectResult<Response<Bytes>> {
        let request = Request::get(url).body(Bytes::new())?;
        self.send(&request).await
    }
}

/// Copy of `request` with its own header map.
pub fn clone_request(request: &Request<Bytes>) -> Request<Bytes> {
    let mut clone = Request::new(request.body().clone());
    *clone.method_mut() = request.method().clone();
    *clone.uri_mut() = request.uri().clone();
    *clone.version_mut() = request.version();
    *clone.headers_mut() = request.headers().clone();
    *clone.extensions_mut() = request.extensions().clone();
    clone
}

/// URI in the form the HTTP client puts on the wire.
///
/// Absolute URIs go through the WHATWG URL parser, which resolves `.` and `..`
/// segments, so the signed path and the sent path are the same.
pub fn normalize_uri(uri: &Uri) -> ConnectResult<Uri> {
    if uri.scheme().is_none() {
        return Ok(uri.clone());
    }
    let url = Url::parse(&uri.to_string())
        .map_err(|err| ConnectError::InvalidRequest(err.to_string()))?;
    url.as_str()
        .parse::<Uri>()
        .map_err(|err| ConnectError::InvalidRequest(err.to_string()))
}

pub(crate) fn set_jwt_header(request: &mut Request<Bytes>, token: &str) -> ConnectResult<()> {
    let value = HeaderValue::from_str(&format!("{AUTHORIZATION_SCHEME} {token}"))
        .map_err(|err| ConnectError::Signing(err.to_string()))?;
    request.headers_mut().insert(AUTHORIZATION, value);
    Ok(())
}

//! # Stateless request/response mapping for Qiita API v2
//!
//! Mapping overview:
//! - Request: `GET {base}/api/v2/{segments..}`, each segment percent-encoded,
//!   with `Accept: application/json` and an optional bearer token.
//! - 2xx: the body is kept as-is in a [`Response`] for the caller to parse.
//! - Anything else: [`TransportError::Status`] carrying status and body, unless
//!   the call was made with `accept_error_status`, in which case the body is
//!   handed on like a success and decoding decides.

use std::marker::PhantomData;

use bytes::Bytes;
use http::{
    HeaderValue, Request, StatusCode,
    header::{ACCEPT, AUTHORIZATION, USER_AGENT},
};
use serde::de::DeserializeOwned;
use url::Url;

use crate::AuthorizationToken;
use crate::error::{DecodeError, HttpError, TransportError};
use crate::http_client::HttpClient;

/// Path prefix shared by every v2 endpoint
pub const API_PREFIX: [&str; 2] = ["api", "v2"];

/// Trait for API request types
///
/// Implemented on the request parameters themselves. Every endpoint in scope
/// is a plain `GET`, so the request only has to describe where it lives and
/// what comes back.
pub trait ApiRequest {
    /// Stable name for this endpoint, used in logs
    const NAME: &'static str;

    /// Response output type
    type Output: DeserializeOwned;

    /// Path segments below `/api/v2/`, unencoded.
    fn path_segments(&self) -> Vec<&str>;

    /// Decode the response output body.
    ///
    /// Default implementation deserializes from JSON.
    fn decode_output(body: &[u8]) -> Result<Self::Output, DecodeError> {
        Ok(serde_json::from_slice(body)?)
    }
}

/// Per-request options for API calls.
#[derive(Debug, Default, Clone)]
pub struct CallOptions {
    /// Optional Authorization to apply.
    pub auth: Option<AuthorizationToken>,
    /// `User-Agent` header value.
    pub user_agent: Option<String>,
    /// Hand non-2xx bodies to the decoder instead of failing with a status error.
    pub accept_error_status: bool,
}

/// Extension for stateless API calls on any `HttpClient`.
///
/// Example
/// ```no_run
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// use qiita_common::request::ApiExt;
/// use qiita_common::AuthorizationToken;
///
/// let http = reqwest::Client::new();
/// let base = url::Url::parse("https://qiita.com")?;
/// let call = http.api(base).auth(AuthorizationToken::bearer("ACCESS_TOKEN"));
/// // let resp = call.send(&request).await?;
/// # Ok(())
/// # }
/// ```
pub trait ApiExt: HttpClient {
    /// Start building an API call for the given base URL.
    fn api<'a>(&'a self, base: Url) -> ApiCall<'a, Self>
    where
        Self: Sized,
    {
        ApiCall {
            client: self,
            base,
            opts: CallOptions::default(),
        }
    }
}

impl<T: HttpClient> ApiExt for T {}

/// Stateless API call builder.
pub struct ApiCall<'a, C: HttpClient> {
    pub(crate) client: &'a C,
    pub(crate) base: Url,
    pub(crate) opts: CallOptions,
}

impl<'a, C: HttpClient> ApiCall<'a, C> {
    /// Apply Authorization to this call.
    pub fn auth(mut self, token: AuthorizationToken) -> Self {
        self.opts.auth = Some(token);
        self
    }
    /// Replace the builder's options entirely.
    pub fn with_options(mut self, opts: CallOptions) -> Self {
        self.opts = opts;
        self
    }

    /// Send the given typed request and return the undecoded response.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, request), fields(endpoint = R::NAME)))]
    pub async fn send<R>(self, request: &R) -> Result<Response<R>, TransportError>
    where
        R: ApiRequest,
    {
        let http_request = build_http_request(&self.base, request, &self.opts)?;

        let http_response = self
            .client
            .send_http(http_request)
            .await
            .map_err(TransportError::from_client_error)?;

        process_response(http_response, self.opts.accept_error_status)
    }
}

/// Build an HTTP request for an API call given base URL and options
pub fn build_http_request<R>(
    base: &Url,
    req: &R,
    opts: &CallOptions,
) -> core::result::Result<Request<Vec<u8>>, TransportError>
where
    R: ApiRequest,
{
    let segments = req.path_segments();
    // `.` and `..` would be dropped by the URL path normalisation
    if let Some(bad) = segments
        .iter()
        .find(|s| s.is_empty() || **s == "." || **s == "..")
    {
        return Err(TransportError::InvalidRequest(format!(
            "path segment {bad:?} is not allowed for {}",
            R::NAME
        )));
    }

    let mut url = base.clone();
    {
        let mut path = url.path_segments_mut().map_err(|_| {
            TransportError::InvalidRequest(format!("base URL {base} cannot carry a path"))
        })?;
        path.pop_if_empty().extend(API_PREFIX).extend(segments);
    }
    url.set_query(None);

    let mut builder = Request::builder()
        .method(http::Method::GET)
        .uri(url.as_str())
        .header(ACCEPT, "application/json");

    if let Some(token) = &opts.auth {
        if token.is_empty() {
            return Err(TransportError::InvalidRequest(
                "access token is empty".to_string(),
            ));
        }
        let hv = HeaderValue::from_str(&token.header_value()).map_err(|e| {
            TransportError::InvalidRequest(format!("Invalid authorization token: {}", e))
        })?;
        builder = builder.header(AUTHORIZATION, hv);
    }

    if let Some(agent) = &opts.user_agent {
        let hv = HeaderValue::from_str(agent)
            .map_err(|e| TransportError::InvalidRequest(format!("Invalid user agent: {}", e)))?;
        builder = builder.header(USER_AGENT, hv);
    }

    builder
        .body(vec![])
        .map_err(|e| TransportError::InvalidRequest(e.to_string()))
}

/// Process the HTTP response from the server statelessly.
///
/// Exposed to make things more easily pluggable
#[inline]
pub fn process_response<R>(
    http_response: http::Response<Vec<u8>>,
    accept_error_status: bool,
) -> Result<Response<R>, TransportError>
where
    R: ApiRequest,
{
    let status = http_response.status();
    let buffer = Bytes::from(http_response.into_body());

    if !status.is_success() && !accept_error_status {
        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = R::NAME, %status, "non-success status");
        return Err(HttpError {
            status,
            body: Some(buffer),
        }
        .into());
    }

    Ok(Response::new(buffer, status))
}

/// API response wrapper that owns the response buffer
///
/// Generic over the request type so [`Response::parse`] knows the output.
pub struct Response<R>
where
    R: ApiRequest,
{
    _marker: PhantomData<fn() -> R>,
    buffer: Bytes,
    status: StatusCode,
}

impl<R> Response<R>
where
    R: ApiRequest,
{
    /// Create a new response from a buffer and status code
    pub fn new(buffer: Bytes, status: StatusCode) -> Self {
        Self {
            buffer,
            status,
            _marker: PhantomData,
        }
    }

    /// Get the HTTP status code
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the raw body bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the body as text
    pub fn as_str(&self) -> Result<&str, DecodeError> {
        Ok(std::str::from_utf8(&self.buffer)?)
    }

    /// Parse the body into the endpoint's output type
    pub fn parse(&self) -> Result<R::Output, DecodeError> {
        R::decode_output(&self.buffer)
    }
}

impl<R: ApiRequest> Clone for Response<R> {
    fn clone(&self) -> Self {
        Self::new(self.buffer.clone(), self.status)
    }
}

impl<R: ApiRequest> std::fmt::Debug for Response<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Response")
            .field("endpoint", &R::NAME)
            .field("status", &self.status)
            .field("len", &self.buffer.len())
            .finish()
    }
}

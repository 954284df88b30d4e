//! Profile client for the Qiita API v2
//!
//! [`QiitaClient`] wraps any [`HttpClient`] and exposes the three steps of a
//! profile lookup separately: [`fetch`](QiitaClient::fetch) does the round
//! trip, [`decode`](QiitaClient::decode) turns a body into a [`Profile`], and
//! [`get_profile`](QiitaClient::get_profile) chains the two.

use std::sync::LazyLock;

use bon::Builder;
use qiita_common::AuthorizationToken;
use qiita_common::error::{ClientError, DecodeError, TransportError};
use qiita_common::http_client::HttpClient;
use qiita_common::request::{ApiExt, CallOptions};
use url::Url;

use crate::api::users::{self, GetUser, Profile, RawBody};

/// User agent sent when none is configured.
pub const DEFAULT_USER_AGENT: &str = concat!("qiita-rs/", env!("CARGO_PKG_VERSION"));

static DEFAULT_BASE_URL: LazyLock<Url> =
    LazyLock::new(|| Url::parse(qiita_common::DEFAULT_BASE).expect("valid url"));

/// Configuration for a [`QiitaClient`].
#[derive(Debug, Clone, Builder)]
#[builder(start_fn = new)]
pub struct ClientOptions {
    /// API host; paths are appended below it
    #[builder(default = DEFAULT_BASE_URL.clone())]
    pub base: Url,
    /// `User-Agent` header value, omitted when `None`
    #[builder(into)]
    pub user_agent: Option<String>,
    /// Hand non-2xx bodies to the decoder instead of failing with
    /// [`TransportError::Status`]
    #[builder(default)]
    pub accept_error_status: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new().user_agent(DEFAULT_USER_AGENT).build()
    }
}

/// Stateless profile client.
///
/// Holds no per-request state: every call carries its own username and token,
/// and concurrent calls do not interact.
#[derive(Debug, Clone)]
pub struct QiitaClient<C> {
    http: C,
    opts: ClientOptions,
}

#[cfg(feature = "reqwest-client")]
impl Default for QiitaClient<reqwest::Client> {
    fn default() -> Self {
        Self::new(reqwest::Client::new(), ClientOptions::default())
    }
}

impl<C> QiitaClient<C> {
    /// Create a client over the given transport
    pub fn new(http: C, opts: ClientOptions) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            base = %opts.base,
            accept_error_status = opts.accept_error_status,
            "qiita client created"
        );

        Self { http, opts }
    }

    /// Point the client at a different host
    pub fn with_base(mut self, base: Url) -> Self {
        self.opts.base = base;
        self
    }

    /// Set or clear the `User-Agent` header
    pub fn with_user_agent(mut self, agent: Option<String>) -> Self {
        self.opts.user_agent = agent;
        self
    }

    /// Enable/disable passing non-2xx bodies through to the decoder
    pub fn with_accept_error_status(mut self, accept: bool) -> Self {
        self.opts.accept_error_status = accept;
        self
    }

    /// Current options
    pub fn options(&self) -> &ClientOptions {
        &self.opts
    }

    /// Decode a raw body into a [`Profile`]. No side effects.
    pub fn decode(&self, raw: &str) -> Result<Profile, DecodeError> {
        users::decode(raw)
    }

    fn call_options(&self, access_token: &str) -> CallOptions {
        CallOptions {
            auth: Some(AuthorizationToken::bearer(access_token)),
            user_agent: self.opts.user_agent.clone(),
            accept_error_status: self.opts.accept_error_status,
        }
    }
}

impl<C: HttpClient> QiitaClient<C> {
    /// Perform one `GET /api/v2/users/{username}` and return the body undecoded.
    ///
    /// Empty usernames and tokens are rejected before anything is sent.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, access_token), fields(username = %username)))]
    pub async fn fetch(&self, username: &str, access_token: &str) -> Result<RawBody, TransportError> {
        if username.is_empty() {
            return Err(TransportError::InvalidRequest("username is empty".to_string()));
        }

        let request = GetUser::new().username(username).build();
        let result = self
            .http
            .api(self.opts.base.clone())
            .with_options(self.call_options(access_token))
            .send(&request)
            .await;

        #[cfg(feature = "tracing")]
        if let Err(e) = &result {
            tracing::warn!(error = %e, "profile fetch failed");
        }

        result
    }

    /// Fetch then decode. Decoding is never attempted when the fetch fails.
    #[cfg_attr(feature = "tracing", tracing::instrument(level = "debug", skip(self, access_token), fields(username = %username)))]
    pub async fn get_profile(
        &self,
        username: &str,
        access_token: &str,
    ) -> Result<Profile, ClientError> {
        let raw = self.fetch(username, access_token).await?;
        let profile = raw.parse().inspect_err(|_e| {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %_e, status = %raw.status(), "profile decode failed");
        })?;
        Ok(profile)
    }
}

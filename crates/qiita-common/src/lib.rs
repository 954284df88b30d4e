//! Common types for Qiita API v2 clients
//!
//! This crate holds the pieces shared by every endpoint: the [`HttpClient`]
//! transport seam, the error taxonomy in [`error`], and the stateless
//! request/response mapping in [`request`].
//!
//! [`HttpClient`]: crate::http_client::HttpClient

#![warn(missing_docs)]
pub use url;

pub mod error;
/// HTTP client abstraction used by the qiita crates.
pub mod http_client;
pub mod request;

use std::fmt;

/// Default API host.
pub const DEFAULT_BASE: &str = "https://qiita.com";

/// Authorization token for API requests.
///
/// Qiita only accepts personal access tokens as bearer tokens. The value is
/// attached verbatim and never validated beyond being non-empty.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthorizationToken {
    /// Bearer token (personal access token)
    Bearer(String),
}

impl AuthorizationToken {
    /// Wrap a raw access token as a bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer(token.into())
    }

    /// The raw token value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bearer(t) => t,
        }
    }

    /// True when the token carries no characters.
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Render the `Authorization` header value for this token.
    pub fn header_value(&self) -> String {
        match self {
            Self::Bearer(t) => format!("Bearer {t}"),
        }
    }
}

// tokens end up in logs through `{:?}` on call options, keep them out
impl fmt::Debug for AuthorizationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

//! Error types for Qiita API calls

use bytes::Bytes;

/// Client error type wrapping all possible error conditions
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ClientError {
    /// HTTP transport error
    #[error("HTTP transport error: {0}")]
    Transport(
        #[from]
        #[diagnostic_source]
        TransportError,
    ),

    /// Response deserialization failed
    #[error("{0}")]
    Decode(
        #[from]
        #[diagnostic_source]
        DecodeError,
    ),
}

impl ClientError {
    /// True if the failure happened before a body was available for decoding.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// True if a body arrived but could not be decoded.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

/// Transport-level errors that occur during HTTP communication
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum TransportError {
    /// Failed to establish connection to server
    #[error("Connection error: {0}")]
    #[diagnostic(
        code(qiita::transport::connect),
        help("check network connectivity, DNS and TLS configuration")
    )]
    Connect(String),

    /// Request timed out
    #[error("Request timeout")]
    #[diagnostic(code(qiita::transport::timeout))]
    Timeout,

    /// Request construction failed (empty or dot path segment, bad header value, etc.)
    #[error("Invalid request: {0}")]
    #[diagnostic(code(qiita::transport::invalid_request))]
    InvalidRequest(String),

    /// Server answered with a non-success status
    #[error("{0}")]
    #[diagnostic(
        code(qiita::transport::status),
        help("401 usually means the access token is missing scopes or has been revoked")
    )]
    Status(#[from] HttpError),

    /// Other transport error
    #[error("Transport error: {0}")]
    #[diagnostic(code(qiita::transport::other))]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl TransportError {
    /// Classify an error produced by an [`HttpClient`](crate::http_client::HttpClient).
    ///
    /// `reqwest` errors and I/O errors are mapped onto the matching variant,
    /// anything else ends up in [`TransportError::Other`].
    pub fn from_client_error<E>(e: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let boxed: Box<dyn std::error::Error + Send + Sync> = Box::new(e);

        #[cfg(feature = "reqwest-client")]
        let boxed = match boxed.downcast::<reqwest::Error>() {
            Ok(e) => return Self::from(*e),
            Err(other) => other,
        };

        match boxed.downcast::<std::io::Error>() {
            Ok(e) => Self::from(*e),
            Err(other) => Self::Other(other),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match e.kind() {
            ErrorKind::TimedOut => Self::Timeout,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => Self::Connect(e.to_string()),
            _ => Self::Other(Box::new(e)),
        }
    }
}

#[cfg(feature = "reqwest-client")]
impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if e.is_builder() {
            Self::InvalidRequest(e.to_string())
        } else {
            Self::Other(Box::new(e))
        }
    }
}

/// Response deserialization errors
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum DecodeError {
    /// JSON deserialization failed, including missing or mistyped fields
    #[error("Failed to deserialize JSON: {0}")]
    #[diagnostic(
        code(qiita::decode::json),
        help("the body must be a JSON object carrying every required field")
    )]
    Json(
        #[from]
        #[source]
        serde_json::Error,
    ),
    /// Body was not valid UTF-8
    #[error("Response body is not UTF-8: {0}")]
    #[diagnostic(code(qiita::decode::utf8))]
    Utf8(
        #[from]
        #[source]
        std::str::Utf8Error,
    ),
}

/// HTTP error response (non-2xx status codes)
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub struct HttpError {
    /// HTTP status code
    pub status: http::StatusCode,
    /// Response body if available
    pub body: Option<Bytes>,
}

impl HttpError {
    /// Parse the body as the API's `{"message": .., "type": ..}` error object.
    pub fn api_error(&self) -> Option<ApiErrorBody> {
        self.body
            .as_ref()
            .and_then(|b| serde_json::from_slice(b).ok())
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "HTTP {}", self.status)?;
        if let Some(body) = &self.body {
            if let Ok(s) = std::str::from_utf8(body) {
                write!(f, ":\n{}", s)?;
            }
        }
        Ok(())
    }
}

/// Error object the API returns alongside non-2xx statuses
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct ApiErrorBody {
    /// Human readable message
    pub message: String,
    /// Machine readable error type, e.g. `unauthorized`
    #[serde(rename = "type")]
    pub kind: String,
}

/// Result type for client operations
pub type ClientResult<T> = std::result::Result<T, ClientError>;

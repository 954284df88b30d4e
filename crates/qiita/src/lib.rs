//! # qiita
//!
//! Typed client for the Qiita API v2 user profile endpoint.
//!
//! One lookup is a single authenticated `GET /api/v2/users/{username}`
//! followed by a JSON decode into [`Profile`]. The outcome is always a
//! `Result`: either a fully populated profile or a [`ProfileError`] saying
//! whether the transport or the decode failed.
//!
//! ## Example
//!
//! ```no_run
//! use qiita::client::QiitaClient;
//!
//! #[tokio::main]
//! async fn main() -> miette::Result<()> {
//!     let client = QiitaClient::default();
//!     let profile = client.get_profile("Yuritani", "ACCESS_TOKEN").await?;
//!
//!     for (label, value) in profile.display_rows() {
//!         println!("{label}: {value}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! To keep the lookup off an interface thread and get the result back on it,
//! see [`dispatch::request_profile`].
//!
//! ## Status codes
//!
//! Non-2xx responses fail with [`TransportError::Status`] by default, so an
//! API error body is never mistaken for a malformed profile. Set
//! [`ClientOptions::accept_error_status`](client::ClientOptions::accept_error_status)
//! to hand such bodies to the decoder instead.
//!
//! [`TransportError::Status`]: qiita_common::error::TransportError::Status

pub mod api;
pub mod client;
pub mod dispatch;

pub use api::users::{GetUser, Profile, RawBody, decode};
pub use qiita_common as common;
pub use qiita_common::AuthorizationToken;
pub use qiita_common::error::{DecodeError, TransportError};

/// Failure of a whole lookup: transport or decode.
pub type ProfileError = qiita_common::error::ClientError;

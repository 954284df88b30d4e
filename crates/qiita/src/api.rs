//! Typed Qiita API v2 endpoints.

pub mod users;

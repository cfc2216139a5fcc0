//! Profile patents API client: the publishing stage of the pipeline.
//!
//! Covers the upload flow: OAuth token storage, payload mapping, duplicate
//! check against the existing entries, one creation call per new patent.
//!
//! No browser handling. No retries: a failed creation is reported and the
//! batch moves on.

mod auth;
mod client;
mod error;
mod payload;
mod publisher;

pub use auth::{
    auth_file_path, delete_auth, load_auth, load_auth_from, save_auth, save_auth_to, OAuthApp,
    ProfileCredentials, AUTHORIZATION_URL, DEFAULT_REDIRECT_URI, SCOPES, TOKEN_URL,
};
pub use client::{ProfileClient, RemotePatent, DEFAULT_API_BASE};
pub use error::{ProfileError, Result};
pub use payload::{validate_all, NamedEntity, Office, PatentPayload, SUMMARY_LIMIT};
pub use publisher::{normalize_title, Publisher, UploadReport};

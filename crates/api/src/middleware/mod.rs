//! Authentication extractors.
//!
//! - [`auth::AuthUser`] -- requires a valid JWT Bearer token (401 otherwise).
//! - [`auth::MaybeAuthUser`] -- the same, but anonymous on a missing or bad token.

pub mod auth;

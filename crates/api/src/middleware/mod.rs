//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a Bearer token, the
//!   `session` cookie, or an `X-Api-Key` header.

pub mod auth;

//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! Sign-up and login live outside this service; it only verifies the
//! tokens an identity provider issues with the shared secret.

pub mod jwt;

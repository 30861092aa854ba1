//! Pure domain logic for the Reelcraft marketing-video backend.
//!
//! Nothing in this crate talks to the database or to a vendor API. The one
//! exception is [`ffmpeg`], which shells out to the `ffmpeg` binary for
//! stitching.

pub mod ads;
pub mod api_keys;
pub mod brand;
pub mod calendar;
pub mod cost;
pub mod error;
pub mod ffmpeg;
pub mod generation;
pub mod hashing;
pub mod polling;
pub mod prompts;
pub mod roles;
pub mod scene;
pub mod storage;
pub mod types;
pub mod workflow;

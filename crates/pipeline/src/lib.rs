//! Generation orchestration for Reelcraft.
//!
//! Everything here takes a [`PipelineContext`] holding the pool, vendor
//! clients, object store, and event bus, so the API handlers and the worker
//! binary drive the same code:
//!
//! - [`creative`]: LLM strategy, scene breakdown, and prompt optimization.
//! - [`submit`]: expand approved scenes into a batch of video jobs.
//! - [`poll`]: query one remote operation and record the outcome.
//! - [`poller`]: background loop polling every processing video.
//! - [`media`]: synchronous image and voiceover generation.
//! - [`stitch`]: concatenate finished clips into the final video.
//! - [`ads`]: stub ad publishers and simulated performance.

pub mod ads;
pub mod budget;
pub mod context;
pub mod creative;
pub mod error;
pub mod limiter;
pub mod media;
pub mod poll;
pub mod poller;
pub mod stitch;
pub mod submit;

pub use context::PipelineContext;
pub use error::{PipelineError, PipelineResult};
pub use limiter::GenerationLimiter;
pub use poller::GenerationPoller;

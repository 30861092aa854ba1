use reelcraft_ai::AiError;
use reelcraft_cloud::StorageError;
use reelcraft_core::error::CoreError;
use reelcraft_core::ffmpeg::FfmpegError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Ai(#[from] AiError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Ffmpeg(#[from] FfmpegError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    pub(crate) fn not_found(entity: &'static str, id: reelcraft_core::types::DbId) -> Self {
        PipelineError::Core(CoreError::NotFound { entity, id })
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        PipelineError::Core(CoreError::Conflict(message.into()))
    }
}

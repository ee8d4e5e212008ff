use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("Please enter a video URL")]
    EmptyInput,

    #[error("Only YouTube videos are allowed")]
    UnsupportedUrl,

    #[error("Could not extract filename: {0}")]
    Filename(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("Download cancelled")]
    Cancelled,
}

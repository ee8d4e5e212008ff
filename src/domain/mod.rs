pub mod error;
pub mod filename;
pub mod model;
pub mod progress;

pub use error::AppError;
pub use filename::{resolve_filename, DEFAULT_FILENAME};
pub use model::{DownloadOutcome, SubmissionPhase, TransferState};

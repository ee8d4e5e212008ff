use std::path::PathBuf;

/// Result of one successful submission, after the file has been written.
#[derive(Debug, Clone)]
pub struct DownloadOutcome {
    pub path: PathBuf,
    pub filename: String,
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Requesting,
}

/// Loading flag and percentage shown by the form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferState {
    pub phase: SubmissionPhase,
    pub percentage: u8,
}

impl TransferState {
    pub fn is_loading(&self) -> bool {
        self.phase != SubmissionPhase::Idle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

pub mod download_coordinator;
pub mod sink;

pub use download_coordinator::{DownloadCoordinator, TransferEvent};
pub use sink::{DirectorySink, DownloadSink, SaveDialogSink};

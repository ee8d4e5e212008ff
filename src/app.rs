use std::time::Duration;

use futures::{stream::BoxStream, StreamExt};
use iced::{time::Instant, widget::stack, Subscription, Task};

use crate::api::ApiClient;
use crate::application::{DownloadCoordinator, TransferEvent};
use crate::config::AppConfig;
use crate::domain::{progress, AppError, DownloadOutcome, SubmissionPhase};
use crate::ui::{DownloadMessage, DownloadView, Notifier, Variant};

const FILENAME_ERROR_TOAST: &str = "Error extracting filename";
const SUCCESS_TOAST: &str = "Audio downloaded successfully";
const FAILURE_TOAST: &str = "Error downloading the audio";

pub struct DownloadApp {
    view: DownloadView,
    coordinator: DownloadCoordinator,
    notifier: Notifier,
}

impl DownloadApp {
    pub fn new(config: &AppConfig) -> Self {
        let api_client = ApiClient::new(config.api.clone());

        Self {
            view: DownloadView::default(),
            coordinator: DownloadCoordinator::new(api_client, config.sink()),
            notifier: Notifier::default(),
        }
    }

    fn submit(&mut self) -> Task<Message> {
        match self.start() {
            Some(stream) => Task::stream(stream.map(Message::Transfer)),
            None => Task::none(),
        }
    }

    /// Validate the current input and move to `Requesting`.
    ///
    /// Returns the transfer to schedule, or `None` if the submission was
    /// ignored (already loading) or rejected (validation toast shown).
    fn start(&mut self) -> Option<BoxStream<'static, TransferEvent>> {
        if self.view.transfer.is_loading() {
            return None;
        }

        self.view.transfer.reset();
        self.view.transfer.phase = SubmissionPhase::Validating;

        match self.coordinator.submit(self.view.video_url.clone()) {
            Ok(stream) => {
                self.view.transfer.phase = SubmissionPhase::Requesting;
                tracing::info!("Requesting audio for {}", self.view.video_url);
                Some(stream)
            }
            Err(e) => {
                self.view.transfer.reset();
                tracing::debug!("Rejected {:?}: {}", self.view.video_url, e);
                self.notifier.push(e.to_string(), Variant::Default);
                None
            }
        }
    }

    fn on_transfer(&mut self, event: TransferEvent) {
        match event {
            TransferEvent::Progress { loaded, total } => {
                if let Some(percentage) = progress::percentage(loaded, total) {
                    self.view.transfer.percentage = percentage;
                }
            }
            TransferEvent::FilenameFallback(e) => {
                tracing::warn!("Using default filename: {}", e);
                self.notifier.push(FILENAME_ERROR_TOAST, Variant::Destructive);
            }
            TransferEvent::Finished(Ok(outcome)) => self.on_success(outcome),
            TransferEvent::Finished(Err(e)) => self.on_failure(e),
        }
    }

    fn on_success(&mut self, outcome: DownloadOutcome) {
        tracing::info!(
            "Saved {} ({}) to {}",
            outcome.filename,
            outcome.mime.as_deref().unwrap_or("unknown type"),
            outcome.path.display()
        );
        self.view.transfer.reset();
        self.notifier.push(SUCCESS_TOAST, Variant::Default);
    }

    fn on_failure(&mut self, error: AppError) {
        self.view.transfer.reset();
        tracing::error!("Download failed: {}", error);

        let title = match error {
            AppError::Cancelled => error.to_string(),
            _ => FAILURE_TOAST.to_string(),
        };
        self.notifier.push(title, Variant::Destructive);
    }
}

#[derive(Debug, Clone)]
pub enum Message {
    UiMessage(DownloadMessage),
    Transfer(TransferEvent),
    Tick(Instant),
}

pub fn update(app: &mut DownloadApp, message: Message) -> Task<Message> {
    match message {
        Message::UiMessage(ui_msg) => {
            app.view.update(ui_msg.clone());

            match ui_msg {
                DownloadMessage::SubmitPressed => return app.submit(),
                DownloadMessage::DismissToast(id) => app.notifier.dismiss(id),
                DownloadMessage::VideoUrlChanged(_) => {}
            }
        }
        Message::Transfer(event) => app.on_transfer(event),
        Message::Tick(now) => {
            app.notifier.prune(now);
            if app.view.transfer.is_loading() {
                app.view.advance_spinner();
            }
        }
    }
    Task::none()
}

pub fn view(app: &DownloadApp) -> iced::Element<'_, Message> {
    let content: iced::Element<'_, DownloadMessage> =
        stack![app.view.view(), app.notifier.view()].into();
    content.map(Message::UiMessage)
}

/// Ticks drive the spinner and toast expiry; idle otherwise.
pub fn subscription(app: &DownloadApp) -> Subscription<Message> {
    if app.view.transfer.is_loading() || !app.notifier.is_empty() {
        iced::time::every(Duration::from_millis(150)).map(Message::Tick)
    } else {
        Subscription::none()
    }
}

pub mod toast;

use iced::{
    alignment::{Horizontal, Vertical},
    widget::{button, column, container, progress_bar, row, text, text_input, Space},
    Element, Length,
};

use crate::domain::TransferState;

pub use toast::{Notifier, Variant};

const SPINNER_FRAMES: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Main view state
#[derive(Default)]
pub struct DownloadView {
    pub video_url: String,
    pub transfer: TransferState,
    spinner_frame: usize,
}

#[derive(Debug, Clone)]
pub enum DownloadMessage {
    VideoUrlChanged(String),
    SubmitPressed,
    DismissToast(u64),
}

impl DownloadView {
    pub fn update(&mut self, message: DownloadMessage) {
        match message {
            DownloadMessage::VideoUrlChanged(url) => {
                self.video_url = url;
            }
            DownloadMessage::SubmitPressed | DownloadMessage::DismissToast(_) => {
                // Will be handled by the app
            }
        }
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let loading = self.transfer.is_loading();

        let input = text_input("Type or paste the video URL...", &self.video_url)
            .on_input(DownloadMessage::VideoUrlChanged)
            .padding(10);
        let input = if loading {
            input
        } else {
            input.on_submit(DownloadMessage::SubmitPressed)
        };

        let action: Element<'_, DownloadMessage> = if loading {
            row![
                text("Downloading...").size(14),
                text(SPINNER_FRAMES[self.spinner_frame]).size(18),
            ]
            .spacing(8)
            .align_y(Vertical::Center)
            .into()
        } else {
            button(
                text("Download")
                    .width(Length::Fill)
                    .align_x(Horizontal::Center),
            )
            .width(Length::Fill)
            .padding([10, 20])
            .on_press(DownloadMessage::SubmitPressed)
            .into()
        };

        let form = container(
            column![
                text("Audio Downloader").size(28),
                Space::new().height(Length::Fixed(10.0)),
                text("URL").size(16),
                input,
                container(action).center_x(Length::Fill),
            ]
            .spacing(10)
            .max_width(420.0),
        )
        .padding(20)
        .center(Length::Fill);

        let top_bar: Element<'_, DownloadMessage> = if loading {
            progress_bar(0.0..=100.0, f32::from(self.transfer.percentage)).into()
        } else {
            Space::new().height(Length::Fixed(0.0)).into()
        };

        column![top_bar, form].into()
    }
}

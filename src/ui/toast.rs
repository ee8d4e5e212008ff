use std::time::Duration;

use iced::{
    alignment::{Horizontal, Vertical},
    time::Instant,
    widget::{button, column, container, row, text},
    Color, Element, Length,
};

use super::DownloadMessage;

/// How long a toast stays on screen.
pub const TOAST_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub title: String,
    pub variant: Variant,
    created: Instant,
}

/// Application-wide toast queue.
#[derive(Debug, Default)]
pub struct Notifier {
    toasts: Vec<Toast>,
    next_id: u64,
}

impl Notifier {
    pub fn push(&mut self, title: impl Into<String>, variant: Variant) {
        self.push_at(title, variant, Instant::now());
    }

    pub fn push_at(&mut self, title: impl Into<String>, variant: Variant, now: Instant) {
        let toast = Toast {
            id: self.next_id,
            title: title.into(),
            variant,
            created: now,
        };
        self.next_id += 1;
        self.toasts.push(toast);
    }

    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Drop toasts older than [`TOAST_TTL`].
    pub fn prune(&mut self, now: Instant) {
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.created) < TOAST_TTL);
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }

    pub fn view(&self) -> Element<'_, DownloadMessage> {
        let stack = self
            .toasts
            .iter()
            .fold(column![].spacing(8), |col, toast| col.push(toast_card(toast)));

        container(stack)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(16)
            .align_x(Horizontal::Right)
            .align_y(Vertical::Bottom)
            .into()
    }
}

fn toast_card(toast: &Toast) -> Element<'_, DownloadMessage> {
    let title = match toast.variant {
        Variant::Default => text(&toast.title).size(14),
        Variant::Destructive => text(&toast.title)
            .size(14)
            .color(Color::from_rgb(0.94, 0.27, 0.27)),
    };

    container(
        row![
            title.width(Length::Fill),
            button(text("×").size(14))
                .style(button::text)
                .on_press(DownloadMessage::DismissToast(toast.id)),
        ]
        .spacing(8)
        .align_y(Vertical::Center),
    )
    .width(Length::Fixed(280.0))
    .padding(12)
    .style(container::rounded_box)
    .into()
}

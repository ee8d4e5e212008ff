mod api;
mod app;
mod application;
mod config;
mod domain;
mod logging;
mod ui;
mod utils;

use iced::{window, Size};

fn main() -> iced::Result {
    dotenvy::dotenv().ok();

    logging::init_logging();
    let config = config::AppConfig::from_env();

    tracing::info!(
        "Starting with API {} ({})",
        config.api.base_url,
        match &config.output_dir {
            Some(dir) => format!("saving to {}", dir.display()),
            None => "asking for a save location".to_string(),
        }
    );

    iced::application(move || app::DownloadApp::new(&config), app::update, app::view)
        .title("Audio Downloader")
        .subscription(app::subscription)
        .window(window::Settings {
            size: Size::new(480.0, 360.0),
            ..Default::default()
        })
        .run()
}

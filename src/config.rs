use std::path::PathBuf;
use std::sync::Arc;

use crate::api::ApiConfig;
use crate::application::{DirectorySink, DownloadSink, SaveDialogSink};

pub const API_URL_VAR: &str = "AUDIO_DOWNLOADER_API_URL";
pub const OUTPUT_DIR_VAR: &str = "AUDIO_DOWNLOADER_OUTPUT_DIR";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub api: ApiConfig,
    /// Save straight into this directory instead of asking each time.
    pub output_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Invalid values are logged
    /// and replaced by defaults.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(raw) = lookup(API_URL_VAR).filter(|v| !v.trim().is_empty()) {
            match url::Url::parse(raw.trim()) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                    config.api.base_url = raw.trim().trim_end_matches('/').to_string();
                }
                Ok(parsed) => tracing::warn!(
                    "{} has unsupported scheme {:?}, using {}",
                    API_URL_VAR,
                    parsed.scheme(),
                    config.api.base_url
                ),
                Err(e) => tracing::warn!(
                    "{} is not a valid URL ({}), using {}",
                    API_URL_VAR,
                    e,
                    config.api.base_url
                ),
            }
        }

        config.output_dir = lookup(OUTPUT_DIR_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        config
    }

    pub fn sink(&self) -> Arc<dyn DownloadSink> {
        match &self.output_dir {
            Some(dir) => Arc::new(DirectorySink::new(dir.clone())),
            None => Arc::new(SaveDialogSink),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults_without_vars() {
        assert_eq!(config_from(&[]), AppConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            (API_URL_VAR, "https://audio.example.com/api/"),
            (OUTPUT_DIR_VAR, "/tmp/music"),
        ]);
        assert_eq!(config.api.base_url, "https://audio.example.com/api");
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/music")));
    }

    #[test]
    fn test_invalid_url_keeps_default() {
        let config = config_from(&[(API_URL_VAR, "not a url")]);
        assert_eq!(config.api, ApiConfig::default());

        let config = config_from(&[(API_URL_VAR, "ftp://files.example.com")]);
        assert_eq!(config.api, ApiConfig::default());
    }
}

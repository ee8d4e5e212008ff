use futures::StreamExt;
use futures::TryStreamExt;
use reqwest::header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::Client;
use thiserror::Error;

use super::models::{ApiConfig, AudioResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    /// Build the endpoint URL for a video.
    ///
    /// The video URL is concatenated as typed, without percent-encoding.
    pub fn download_url(&self, video_url: &str) -> String {
        format!(
            "{}/download/?video={}",
            self.config.base_url.trim_end_matches('/'),
            video_url
        )
    }

    /// Request the audio for `video_url` and return the body as a stream.
    ///
    /// Any non-2xx status is an error. No timeout is set.
    pub async fn request_audio(&self, video_url: &str) -> Result<AudioResponse> {
        let url = self.download_url(video_url);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| ApiError::ApiError(format!("Download request failed: {}", e)))?;

        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE);
        let content_disposition = header(CONTENT_DISPOSITION);
        let total = response.content_length();

        let stream = response
            .bytes_stream()
            .map_err(ApiError::RequestError)
            .boxed();

        Ok(AudioResponse {
            total,
            content_type,
            content_disposition,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client_for(server: &mockito::ServerGuard) -> ApiClient {
        ApiClient::new(ApiConfig {
            base_url: server.url(),
        })
    }

    #[test]
    fn test_download_url_keeps_input_unencoded() {
        let client = ApiClient::new(ApiConfig {
            base_url: "http://api.local/".to_string(),
        });
        assert_eq!(
            client.download_url("https://youtu.be/abc123"),
            "http://api.local/download/?video=https://youtu.be/abc123"
        );
    }

    #[tokio::test]
    async fn test_request_audio_reads_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/download/")
            .match_query(Matcher::UrlEncoded(
                "video".into(),
                "https://youtu.be/abc123".into(),
            ))
            .with_status(200)
            .with_header("content-type", "audio/mp4")
            .with_header("content-disposition", r#"attachment; filename="clip.mp4""#)
            .with_body(vec![1u8, 2, 3, 4])
            .create_async()
            .await;

        let response = client_for(&server)
            .request_audio("https://youtu.be/abc123")
            .await
            .unwrap();

        assert_eq!(response.total, Some(4));
        assert_eq!(response.content_type.as_deref(), Some("audio/mp4"));
        assert_eq!(
            response.content_disposition.as_deref(),
            Some(r#"attachment; filename="clip.mp4""#)
        );

        let body = response
            .stream
            .try_fold(Vec::new(), |mut acc, chunk| async move {
                acc.extend_from_slice(&chunk);
                Ok(acc)
            })
            .await
            .unwrap();
        assert_eq!(body, vec![1, 2, 3, 4]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_request_audio_rejects_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download/")
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let err = client_for(&server)
            .request_audio("https://youtu.be/abc123")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::ApiError(_)));
    }
}

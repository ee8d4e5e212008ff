use bytes::Bytes;
use futures::stream::BoxStream;

use super::client::Result;

/// Configuration for the API client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
        }
    }
}

/// Headers of a successful `/download/` response plus its body stream.
pub struct AudioResponse {
    /// `Content-Length`, when the server reports it
    pub total: Option<u64>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub stream: BoxStream<'static, Result<Bytes>>,
}

impl std::fmt::Debug for AudioResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioResponse")
            .field("total", &self.total)
            .field("content_type", &self.content_type)
            .field("content_disposition", &self.content_disposition)
            .finish_non_exhaustive()
    }
}

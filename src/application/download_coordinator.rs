use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use futures::{stream::BoxStream, StreamExt};

use crate::{
    api::{ApiClient, AudioResponse},
    domain::{resolve_filename, AppError, DownloadOutcome},
    utils::is_supported_video_url,
};

use super::sink::DownloadSink;

#[derive(Debug, Clone)]
pub enum TransferEvent {
    /// Bytes received so far; `total` is known only if the server sent a length.
    Progress { loaded: u64, total: Option<u64> },
    /// The response carried no usable filename; the default is used instead.
    /// Sent before saving, so it is reported even if saving fails.
    FilenameFallback(AppError),
    /// Emitted exactly once, last.
    Finished(Result<DownloadOutcome, AppError>),
}

#[derive(Clone)]
pub struct DownloadCoordinator {
    api_client: ApiClient,
    sink: Arc<dyn DownloadSink>,
}

impl DownloadCoordinator {
    pub fn new(api_client: ApiClient, sink: Arc<dyn DownloadSink>) -> Self {
        Self { api_client, sink }
    }

    pub fn validate(video_url: &str) -> Result<(), AppError> {
        if video_url.trim().is_empty() {
            return Err(AppError::EmptyInput);
        }
        if !is_supported_video_url(video_url) {
            return Err(AppError::UnsupportedUrl);
        }
        Ok(())
    }

    /// Validate `video_url` and, if it passes, start the transfer.
    ///
    /// Nothing touches the network until the returned stream is polled.
    pub fn submit(&self, video_url: String) -> Result<BoxStream<'static, TransferEvent>, AppError> {
        Self::validate(&video_url)?;
        Ok(self.transfer_stream(video_url))
    }

    fn transfer_stream(&self, video_url: String) -> BoxStream<'static, TransferEvent> {
        futures::stream::unfold(
            TransferRuntimeState::Start {
                client: self.api_client.clone(),
                sink: self.sink.clone(),
                video_url,
            },
            |state| async move {
                match state {
                    TransferRuntimeState::Start {
                        client,
                        sink,
                        video_url,
                    } => match client.request_audio(&video_url).await {
                        Ok(response) => {
                            let total = response.total;
                            Some((
                                TransferEvent::Progress { loaded: 0, total },
                                TransferRuntimeState::Receiving {
                                    sink,
                                    buffer: BytesMut::new(),
                                    response,
                                },
                            ))
                        }
                        Err(e) => Some((
                            TransferEvent::Finished(Err(AppError::Api(e.to_string()))),
                            TransferRuntimeState::Finished,
                        )),
                    },
                    TransferRuntimeState::Receiving {
                        sink,
                        mut buffer,
                        mut response,
                    } => match response.stream.next().await {
                        Some(Ok(chunk)) => {
                            buffer.extend_from_slice(&chunk);
                            let event = TransferEvent::Progress {
                                loaded: buffer.len() as u64,
                                total: response.total,
                            };
                            Some((
                                event,
                                TransferRuntimeState::Receiving {
                                    sink,
                                    buffer,
                                    response,
                                },
                            ))
                        }
                        Some(Err(e)) => Some((
                            TransferEvent::Finished(Err(AppError::Api(e.to_string()))),
                            TransferRuntimeState::Finished,
                        )),
                        None => {
                            let (filename, filename_error) =
                                resolve_filename(response.content_disposition.as_deref());
                            let payload = buffer.freeze();
                            let mime = response.content_type;
                            match filename_error {
                                Some(e) => Some((
                                    TransferEvent::FilenameFallback(e),
                                    TransferRuntimeState::Saving {
                                        sink,
                                        payload,
                                        filename,
                                        mime,
                                    },
                                )),
                                None => {
                                    let result = save(sink, payload, filename, mime).await;
                                    Some((TransferEvent::Finished(result), TransferRuntimeState::Finished))
                                }
                            }
                        }
                    },
                    TransferRuntimeState::Saving {
                        sink,
                        payload,
                        filename,
                        mime,
                    } => {
                        let result = save(sink, payload, filename, mime).await;
                        Some((TransferEvent::Finished(result), TransferRuntimeState::Finished))
                    }
                    TransferRuntimeState::Finished => None,
                }
            },
        )
        .boxed()
    }
}

async fn save(
    sink: Arc<dyn DownloadSink>,
    payload: Bytes,
    filename: String,
    mime: Option<String>,
) -> Result<DownloadOutcome, AppError> {
    let path = sink
        .materialize(payload, &filename, mime.as_deref())
        .await?;

    Ok(DownloadOutcome {
        path,
        filename,
        mime,
    })
}

enum TransferRuntimeState {
    Start {
        client: ApiClient,
        sink: Arc<dyn DownloadSink>,
        video_url: String,
    },
    Receiving {
        sink: Arc<dyn DownloadSink>,
        buffer: BytesMut,
        response: AudioResponse,
    },
    Saving {
        sink: Arc<dyn DownloadSink>,
        payload: Bytes,
        filename: String,
        mime: Option<String>,
    },
    Finished,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiConfig;
    use crate::application::sink::DirectorySink;
    use crate::domain::DEFAULT_FILENAME;
    use mockito::Matcher;

    fn coordinator(server: &mockito::ServerGuard, dir: &std::path::Path) -> DownloadCoordinator {
        DownloadCoordinator::new(
            ApiClient::new(ApiConfig {
                base_url: server.url(),
            }),
            Arc::new(DirectorySink::new(dir)),
        )
    }

    fn finished(events: Vec<TransferEvent>) -> Result<DownloadOutcome, AppError> {
        let finished: Vec<_> = events
            .into_iter()
            .filter_map(|event| match event {
                TransferEvent::Finished(result) => Some(result),
                TransferEvent::Progress { .. } | TransferEvent::FilenameFallback(_) => None,
            })
            .collect();
        assert_eq!(finished.len(), 1, "exactly one terminal event");
        finished.into_iter().next().unwrap()
    }

    fn events_have_fallback(events: &[TransferEvent]) -> bool {
        events
            .iter()
            .any(|event| matches!(event, TransferEvent::FilenameFallback(_)))
    }

    #[test]
    fn test_validate() {
        assert_eq!(DownloadCoordinator::validate(""), Err(AppError::EmptyInput));
        assert_eq!(DownloadCoordinator::validate("   "), Err(AppError::EmptyInput));
        assert_eq!(
            DownloadCoordinator::validate("https://vimeo.com/1"),
            Err(AppError::UnsupportedUrl)
        );
        assert!(DownloadCoordinator::validate("https://youtu.be/abc123").is_ok());
    }

    #[tokio::test]
    async fn test_invalid_url_never_hits_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();

        let result = coordinator(&server, dir.path()).submit("https://vimeo.com/123".to_string());

        assert!(matches!(result, Err(AppError::UnsupportedUrl)));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_successful_transfer_saves_one_file() {
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
            .with_body(b"arbitrary audio bytes")
            .expect(1)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();

        let events: Vec<_> = coordinator(&server, dir.path())
            .submit("https://youtu.be/abc123".to_string())
            .unwrap()
            .collect()
            .await;

        let last_progress = events.iter().rev().find_map(|event| match event {
            TransferEvent::Progress { loaded, total } => Some((*loaded, *total)),
            _ => None,
        });
        assert_eq!(last_progress, Some((21, Some(21))));
        assert!(!events_have_fallback(&events));

        let outcome = finished(events).unwrap();
        assert_eq!(outcome.filename, "clip.mp4");
        assert_eq!(outcome.mime.as_deref(), Some("audio/mp4"));
        assert_eq!(outcome.path, dir.path().join("clip.mp4"));
        assert_eq!(
            tokio::fs::read(&outcome.path).await.unwrap(),
            b"arbitrary audio bytes"
        );

        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_header_falls_back_to_default_name() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download/")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(b"abc")
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();

        let events: Vec<_> = coordinator(&server, dir.path())
            .submit("https://www.youtube.com/watch?v=abc".to_string())
            .unwrap()
            .collect()
            .await;

        let fallbacks: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, TransferEvent::FilenameFallback(AppError::Filename(_))))
            .collect();
        assert_eq!(fallbacks.len(), 1);

        let outcome = finished(events).unwrap();
        assert_eq!(outcome.filename, DEFAULT_FILENAME);
        assert_eq!(outcome.path, dir.path().join(DEFAULT_FILENAME));
    }

    #[tokio::test]
    async fn test_error_status_finishes_with_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/download/")
            .match_query(Matcher::Any)
            .with_status(404)
            .create_async()
            .await;
        let dir = tempfile::tempdir().unwrap();

        let events: Vec<_> = coordinator(&server, dir.path())
            .submit("https://youtu.be/missing".to_string())
            .unwrap()
            .collect()
            .await;

        assert_eq!(events.len(), 1);
        assert!(matches!(finished(events), Err(AppError::Api(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}

use crate::router;
use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::path::Path;
use std::sync::Arc;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::broadcast;
use tokio_util::codec::{Framed, LengthDelimitedCodec};
use veritas_core::ipc::{VeritasRequest, VeritasResponse};
use veritas_core::VerificationRouter;

/// 4-byte little-endian length prefix, MessagePack payload.
pub fn frame_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder().little_endian().new_codec()
}

/// Decode one request frame, verify, and encode the reply.
///
/// A frame that is not a valid request gets an error response rather than
/// closing the connection.
pub async fn handle_frame(
    frame: &[u8],
    verifier: &VerificationRouter,
) -> Result<Vec<u8>, rmp_serde::encode::Error> {
    let response = match rmp_serde::from_slice::<VeritasRequest>(frame) {
        Ok(request) => router::handle_request(request, verifier).await,
        Err(e) => {
            tracing::warn!(error = %e, bytes = frame.len(), "Undecodable IPC frame");
            VeritasResponse::err(format!("Deserialization error: {}", e))
        }
    };
    rmp_serde::to_vec_named(&response)
}

async fn serve_connection(stream: UnixStream, verifier: Arc<VerificationRouter>) {
    let mut framed = Framed::new(stream, frame_codec());

    while let Some(frame) = framed.next().await {
        let frame = match frame {
            Ok(f) => f,
            Err(e) => {
                tracing::error!("Frame error: {}", e);
                return;
            }
        };

        let reply = match handle_frame(&frame, &verifier).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!("Failed to serialize response: {}", e);
                return;
            }
        };

        if let Err(e) = framed.send(Bytes::from(reply)).await {
            tracing::error!("Failed to send response: {}", e);
            return;
        }
    }
    tracing::debug!("IPC client disconnected");
}

/// Serve verification requests on `socket_path` until `shutdown` fires.
/// A stale socket file is replaced on start and removed on exit.
pub async fn run_unix_server(
    socket_path: &str,
    verifier: Arc<VerificationRouter>,
    mut shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    if Path::new(socket_path).exists() {
        std::fs::remove_file(socket_path)?;
    }

    let listener = UnixListener::bind(socket_path)?;
    tracing::info!("IPC server listening on {}", socket_path);

    loop {
        tokio::select! {
            res = listener.accept() => {
                let (stream, _) = res?;
                tokio::spawn(serve_connection(stream, Arc::clone(&verifier)));
            }
            _ = shutdown.recv() => {
                tracing::info!("Shutting down IPC server...");
                break;
            }
        }
    }

    if Path::new(socket_path).exists() {
        std::fs::remove_file(socket_path)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use veritas_core::config::RoutingConfig;
    use veritas_core::models::{ClassificationResult, EvidenceSet, Label};
    use veritas_core::{ArticleFetcher, ArticleSource, ClassifierError, EvidenceSearch, FetchError, TextClassifier};

    struct AlwaysReal;

    #[async_trait]
    impl TextClassifier for AlwaysReal {
        async fn classify(&self, _text: &str) -> Result<ClassificationResult, ClassifierError> {
            Ok(ClassificationResult::from_probability_real(Label::Real, 0.9))
        }

        fn n_features(&self) -> usize {
            1
        }

        fn name(&self) -> &str {
            "always-real"
        }
    }

    struct NoResults;

    #[async_trait]
    impl EvidenceSearch for NoResults {
        async fn search(&self, _query: &str) -> EvidenceSet {
            EvidenceSet::empty()
        }

        fn name(&self) -> &str {
            "none"
        }
    }

    struct NoArticle;

    #[async_trait]
    impl ArticleSource for NoArticle {
        async fn extract(&self, _url: &str) -> Result<String, FetchError> {
            Err(FetchError::Empty)
        }

        fn name(&self) -> &str {
            "none"
        }
    }

    fn verifier() -> VerificationRouter {
        VerificationRouter::new(
            Arc::new(AlwaysReal),
            Arc::new(NoResults),
            Arc::new(ArticleFetcher::new(Box::new(NoArticle), Box::new(NoArticle))),
            RoutingConfig::default(),
        )
    }

    async fn reply_to(request: &VeritasRequest) -> VeritasResponse {
        let frame = rmp_serde::to_vec_named(request).unwrap();
        let reply = handle_frame(&frame, &verifier()).await.unwrap();
        rmp_serde::from_slice(&reply).unwrap()
    }

    #[test]
    fn test_frame_codec_is_little_endian() {
        use tokio_util::codec::Encoder;
        let mut codec = frame_codec();
        let mut buf = bytes::BytesMut::new();
        codec.encode(Bytes::from_static(b"abc"), &mut buf).unwrap();
        assert_eq!(&buf[..], &[3, 0, 0, 0, b'a', b'b', b'c']);
    }

    #[tokio::test]
    async fn test_handle_frame_ping() {
        let resp = reply_to(&VeritasRequest::Ping).await;
        assert!(resp.is_ok());
        assert_eq!(resp.data.unwrap()["pong"], true);
    }

    #[tokio::test]
    async fn test_handle_frame_routes_verify_requests() {
        let short = reply_to(&VeritasRequest::VerifyText {
            text: "water is wet".to_string(),
        })
        .await;
        assert_eq!(short.data.unwrap()["outcome"], "search_unavailable");

        let url = reply_to(&VeritasRequest::VerifyUrl {
            url: "https://news.example/x".to_string(),
        })
        .await;
        assert_eq!(url.data.unwrap()["outcome"], "extraction_failed");
    }

    #[tokio::test]
    async fn test_handle_frame_garbage_is_error_response() {
        let reply = handle_frame(b"\xc1garbage", &verifier()).await.unwrap();
        let resp: VeritasResponse = rmp_serde::from_slice(&reply).unwrap();
        assert!(!resp.is_ok());
        assert!(resp.error.unwrap().starts_with("Deserialization error"));
    }
}

//! IPC integration tests: length-prefixed MessagePack over a Unix socket.

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::sync::broadcast;
use tokio_util::codec::Framed;
use veritas_core::config::{FetchConfig, RoutingConfig};
use veritas_core::ipc::{VeritasRequest, VeritasResponse};
use veritas_core::vectorizer::{Norm, VectorizerArtifact};
use veritas_core::{
    ArticleFetcher, LinearClassifier, LinearModelArtifact, SerpApiConfig, SerpApiSearch,
    TfidfVectorizer, VerificationRouter,
};
use veritas_server::server::{frame_codec, run_unix_server};

fn test_verifier() -> VerificationRouter {
    let vocabulary: HashMap<String, usize> = [("bridge", 0), ("hoax", 1)]
        .into_iter()
        .map(|(t, i)| (t.to_string(), i))
        .collect();
    let vectorizer = TfidfVectorizer::from_artifact(VectorizerArtifact {
        vocabulary,
        idf: vec![1.0, 1.0],
        lowercase: true,
        ngram_range: (1, 1),
        stop_words: vec![],
        sublinear_tf: false,
        norm: Norm::L2,
        token_pattern: None,
    })
    .unwrap();
    let classifier = LinearClassifier::new(
        vectorizer,
        LinearModelArtifact {
            coef: vec![3.0, -3.0],
            intercept: 0.0,
            classes: [0, 1],
        },
    )
    .unwrap();

    // No API key: short claims come back as search unavailable without any network call.
    let search = SerpApiSearch::new(SerpApiConfig {
        api_key: String::new(),
        base_url: "http://127.0.0.1:1".to_string(),
        engine: "google".to_string(),
        max_results: 5,
        timeout_seconds: 1,
    })
    .unwrap();
    let fetcher = ArticleFetcher::from_config(&FetchConfig::default()).unwrap();

    VerificationRouter::new(
        Arc::new(classifier),
        Arc::new(search),
        Arc::new(fetcher),
        RoutingConfig::default(),
    )
}

async fn connect(socket_path: &std::path::Path) -> UnixStream {
    for _ in 0..50 {
        if let Ok(stream) = UnixStream::connect(socket_path).await {
            return stream;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("IPC server did not come up at {}", socket_path.display());
}

async fn roundtrip(
    framed: &mut Framed<UnixStream, tokio_util::codec::LengthDelimitedCodec>,
    request: &VeritasRequest,
) -> VeritasResponse {
    let bytes = rmp_serde::to_vec_named(request).unwrap();
    framed.send(Bytes::from(bytes)).await.unwrap();
    let frame = framed.next().await.unwrap().unwrap();
    rmp_serde::from_slice(&frame).unwrap()
}

#[tokio::test]
async fn test_ipc_ping_and_verify_over_socket() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("veritas-test.sock");
    let socket_str = socket_path.to_string_lossy().to_string();

    let (tx, _rx) = broadcast::channel(1);
    let server_rx = tx.subscribe();
    let verifier = Arc::new(test_verifier());
    let server = tokio::spawn(async move { run_unix_server(&socket_str, verifier, server_rx).await });

    let stream = connect(&socket_path).await;
    let mut framed = Framed::new(stream, frame_codec());

    let pong = roundtrip(&mut framed, &VeritasRequest::Ping).await;
    assert!(pong.is_ok());

    let health = roundtrip(&mut framed, &VeritasRequest::Health).await;
    let data = health.data.unwrap();
    assert_eq!(data["classifier"], "linear");
    assert_eq!(data["search_configured"], false);

    let short = roundtrip(
        &mut framed,
        &VeritasRequest::VerifyText {
            text: "bridge reopened today".to_string(),
        },
    )
    .await;
    assert!(short.is_ok());
    assert_eq!(short.data.unwrap()["outcome"], "search_unavailable");

    let long = roundtrip(
        &mut framed,
        &VeritasRequest::VerifyText {
            text: "officials said the bridge reopened after a long closure for repairs this week"
                .to_string(),
        },
    )
    .await;
    let data = long.data.unwrap();
    assert_eq!(data["outcome"], "classified_real");
    assert_eq!(data["message"], "The News is Real!");

    let blank = roundtrip(
        &mut framed,
        &VeritasRequest::VerifyUrl {
            url: "  ".to_string(),
        },
    )
    .await;
    assert_eq!(blank.data.unwrap()["outcome"], "empty_input");

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
    assert!(!socket_path.exists());
}

#[tokio::test]
async fn test_ipc_garbage_frame_gets_error_response() {
    let dir = tempfile::tempdir().unwrap();
    let socket_path = dir.path().join("veritas-garbage.sock");
    let socket_str = socket_path.to_string_lossy().to_string();

    let (tx, _rx) = broadcast::channel(1);
    let server_rx = tx.subscribe();
    let server = tokio::spawn(run_unix_server_owned(socket_str, server_rx));

    let stream = connect(&socket_path).await;
    let mut framed = Framed::new(stream, frame_codec());

    framed.send(Bytes::from_static(b"\xc1not msgpack")).await.unwrap();
    let frame = framed.next().await.unwrap().unwrap();
    let resp: VeritasResponse = rmp_serde::from_slice(&frame).unwrap();
    assert!(!resp.is_ok());
    assert!(resp.error.unwrap().contains("Deserialization error"));

    // The connection stays usable after a bad frame.
    let pong = roundtrip(&mut framed, &VeritasRequest::Ping).await;
    assert!(pong.is_ok());

    tx.send(()).unwrap();
    server.await.unwrap().unwrap();
}

async fn run_unix_server_owned(
    socket_path: String,
    shutdown: broadcast::Receiver<()>,
) -> anyhow::Result<()> {
    run_unix_server(&socket_path, Arc::new(test_verifier()), shutdown).await
}

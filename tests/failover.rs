use gly_transcribe::audio::AudioFile;
use gly_transcribe::job::{TargetEndpoint, UploadJob};
use gly_transcribe::orchestrator::{RetryPolicy, UploadOrchestrator, MAX_CHUNK_RETRIES};
use gly_transcribe::stt::{ChunkUpload, HttpEndpoint, SttError, TranscribeEndpoint};
use std::time::Duration;
use tokio::sync::watch;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MIB: usize = 1024 * 1024;

fn upload_of(bytes: &[u8]) -> ChunkUpload<'_> {
    ChunkUpload {
        bytes,
        file_name: "1722470400000_ab12cd.mp3_part0.mp3".to_string(),
        mime_type: "audio/mpeg",
        chunk_index: 0,
        total_chunks: 1,
    }
}

fn job_of(size: usize) -> UploadJob {
    UploadJob::new(AudioFile {
        bytes: vec![b'a'; size],
        file_name: "reunion.mp3".to_string(),
        mime_type: "audio/mpeg",
        duration_secs: 40,
    })
}

fn no_cancel() -> watch::Receiver<bool> {
    watch::channel(false).1
}

#[tokio::test]
async fn endpoint_parses_the_backend_field_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/transcribir-audio/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "transcripcion": "hola mundo" })),
        )
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new("primary server", format!("{}/transcribir-audio/", server.uri()));
    let transcript = endpoint.transcribe_chunk(upload_of(b"abc")).await.unwrap();

    assert_eq!(transcript.text, "hola mundo");
}

#[tokio::test]
async fn endpoint_accepts_the_english_field_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "transcription": "good morning" })),
        )
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new("primary server", server.uri());
    let transcript = endpoint.transcribe_chunk(upload_of(b"abc")).await.unwrap();

    assert_eq!(transcript.text, "good morning");
}

#[tokio::test]
async fn server_detail_is_propagated_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503)
                .set_body_json(serde_json::json!({ "detail": "GPU pool exhausted" })),
        )
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new("primary server", server.uri());
    let err = endpoint.transcribe_chunk(upload_of(b"abc")).await.unwrap_err();

    match err {
        SttError::Server { status, detail } => {
            assert_eq!(status, 503);
            assert_eq!(detail, "GPU pool exhausted");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn success_body_without_text_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "ok" })),
        )
        .mount(&server)
        .await;

    let endpoint = HttpEndpoint::new("primary server", server.uri());
    let err = endpoint.transcribe_chunk(upload_of(b"abc")).await.unwrap_err();

    assert!(matches!(err, SttError::MalformedResponse));
}

#[tokio::test]
async fn unreachable_host_maps_to_network_error() {
    // Nothing listens on port 1.
    let endpoint = HttpEndpoint::new("primary server", "http://127.0.0.1:1/transcribir-audio/");
    let err = endpoint.transcribe_chunk(upload_of(b"abc")).await.unwrap_err();

    assert!(matches!(err, SttError::Network(_)));
}

#[tokio::test]
async fn job_fails_over_to_the_secondary_host() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(serde_json::json!({ "detail": "bad gateway" })),
        )
        .mount(&primary)
        .await;

    let fallback = MockServer::start().await;
    for (part, text) in [("_part0.", "A"), ("_part1.", "B"), ("_part2.", "C")] {
        Mock::given(method("POST"))
            .and(body_string_contains(part))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "transcripcion": text })),
            )
            .mount(&fallback)
            .await;
    }

    let mut orchestrator = UploadOrchestrator::new(
        Box::new(HttpEndpoint::new("primary server", primary.uri())),
        Box::new(HttpEndpoint::new("secondary server", fallback.uri())),
    )
    .with_retry_policy(RetryPolicy::with_base_delay(MAX_CHUNK_RETRIES, Duration::ZERO));

    let job = job_of(12 * MIB);
    let outcome = orchestrator.run(&job, no_cancel()).await.unwrap();

    assert_eq!(outcome.transcript, "A B C");
    assert_eq!(outcome.endpoint, TargetEndpoint::Fallback);

    // Three attempts against the primary for chunk 0, then never again.
    let primary_hits = primary.received_requests().await.unwrap();
    assert_eq!(primary_hits.len(), 1 + MAX_CHUNK_RETRIES as usize);

    let fallback_hits = fallback.received_requests().await.unwrap();
    assert_eq!(fallback_hits.len(), 3);
}

#[tokio::test]
async fn job_aborts_after_both_hosts_exhaust_their_budget() {
    let primary = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({ "detail": "primary down" })),
        )
        .mount(&primary)
        .await;

    let fallback = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({ "detail": "fallback down" })),
        )
        .mount(&fallback)
        .await;

    let mut orchestrator = UploadOrchestrator::new(
        Box::new(HttpEndpoint::new("primary server", primary.uri())),
        Box::new(HttpEndpoint::new("secondary server", fallback.uri())),
    )
    .with_retry_policy(RetryPolicy::with_base_delay(MAX_CHUNK_RETRIES, Duration::ZERO));

    let job = job_of(64 * 1024);
    let err = orchestrator.run(&job, no_cancel()).await.unwrap_err();

    assert!(err.to_string().contains("fallback down"));

    let attempts_per_host = 1 + MAX_CHUNK_RETRIES as usize;
    assert_eq!(
        primary.received_requests().await.unwrap().len(),
        attempts_per_host
    );
    assert_eq!(
        fallback.received_requests().await.unwrap().len(),
        attempts_per_host
    );
}

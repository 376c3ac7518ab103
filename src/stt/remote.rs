// src/stt/remote.rs
// HTTP multipart adapter for the transcription backend

use super::{ChunkTranscript, ChunkUpload, SttError, TranscribeEndpoint};
use async_trait::async_trait;
use regex::Regex;
use reqwest::multipart;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

const CONNECT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    #[serde(alias = "transcripcion")]
    transcription: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    detail: Option<String>,
}

/// One remote transcription host. The orchestrator owns one of these per
/// endpoint slot; the overall request deadline is enforced by the caller.
pub struct HttpEndpoint {
    name: String,
    url: String,
    client: reqwest::Client,
}

impl HttpEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        let name = name.into();
        let url = url.into();
        tracing::info!("Endpoint '{}' initialized: {}", name, url);

        Self { name, url, client }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Strip bracketed timestamp markers some engines embed, then collapse
    /// whitespace runs.
    fn clean_transcript(text: &str) -> String {
        static TS_RE: OnceLock<Regex> = OnceLock::new();
        let re = TS_RE.get_or_init(|| {
            Regex::new(r"\[\d{2}:\d{2}.*?\]|\(\d{2}:\d{2}\)").expect("valid timestamp regex")
        });
        let stripped = re.replace_all(text, "");
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

#[async_trait]
impl TranscribeEndpoint for HttpEndpoint {
    async fn transcribe_chunk(&self, upload: ChunkUpload<'_>) -> Result<ChunkTranscript, SttError> {
        let file_part = multipart::Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name.clone())
            .mime_str(upload.mime_type)
            .map_err(|e| SttError::InvalidRequest(e.to_string()))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("chunk_index", upload.chunk_index.to_string())
            .text("total_chunks", upload.total_chunks.to_string());

        let response = self.client.post(&self.url).multipart(form).send().await;

        match response {
            Ok(resp) => {
                let status = resp.status();

                if status.is_success() {
                    let body: TranscriptionResponse =
                        resp.json().await.map_err(|_| SttError::MalformedResponse)?;

                    let text = body
                        .transcription
                        .map(|t| Self::clean_transcript(&t))
                        .unwrap_or_default();

                    if text.is_empty() {
                        return Err(SttError::MalformedResponse);
                    }

                    Ok(ChunkTranscript { text })
                } else {
                    let detail = resp
                        .json::<ErrorResponse>()
                        .await
                        .ok()
                        .and_then(|e| e.detail)
                        .unwrap_or_else(|| "no detail provided".to_string());

                    Err(SttError::Server {
                        status: status.as_u16(),
                        detail,
                    })
                }
            }
            Err(e) => {
                if e.is_timeout() {
                    Err(SttError::Timeout)
                } else {
                    Err(SttError::Network(e.to_string()))
                }
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

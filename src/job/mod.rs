use crate::audio::AudioFile;
use crate::stt::ChunkUpload;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

pub mod chunk;
pub mod progress;
pub mod stitcher;

pub use chunk::{plan_chunks, ChunkSpec, CHUNK_SIZE_BYTES, SINGLE_UPLOAD_LIMIT_BYTES};
pub use progress::JobEvent;

/// Floor for the per-request timeout, in milliseconds.
pub const MIN_REQUEST_TIMEOUT_MS: u64 = 180_000;

/// Timeout budget granted per declared second of audio, in milliseconds.
pub const TIMEOUT_PER_AUDIO_SECOND_MS: u64 = 3_000;

/// Which host the job is currently uploading to. Once a job switches to
/// `Fallback` it never returns to `Primary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetEndpoint {
    Primary,
    Fallback,
}

impl TargetEndpoint {
    pub fn id(self) -> &'static str {
        match self {
            TargetEndpoint::Primary => "primary",
            TargetEndpoint::Fallback => "fallback",
        }
    }
}

impl fmt::Display for TargetEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetEndpoint::Primary => write!(f, "primary server"),
            TargetEndpoint::Fallback => write!(f, "secondary server"),
        }
    }
}

/// One end-to-end attempt to transcribe a single file.
#[derive(Debug, Clone)]
pub struct UploadJob {
    pub file: AudioFile,
    pub chunks: Vec<ChunkSpec>,
    /// Deadline shared by every chunk request of this job.
    pub request_timeout: Duration,
    /// Base name every chunk's file part derives from, fixed per job.
    upload_name: String,
}

impl UploadJob {
    pub fn new(file: AudioFile) -> Self {
        let chunks = plan_chunks(file.bytes.len());
        let request_timeout = request_timeout(file.duration_secs);
        let upload_name = build_upload_name(file.extension());

        tracing::debug!(
            file = %file.file_name,
            chunks = chunks.len(),
            timeout_ms = request_timeout.as_millis() as u64,
            "planned upload job"
        );

        Self {
            file,
            chunks,
            request_timeout,
            upload_name,
        }
    }

    pub fn total_chunks(&self) -> u32 {
        self.chunks.len() as u32
    }

    /// Wire fields for one chunk's multipart request.
    pub fn chunk_upload(&self, chunk: &ChunkSpec) -> ChunkUpload<'_> {
        ChunkUpload {
            bytes: &self.file.bytes[chunk.offset..chunk.offset + chunk.len],
            file_name: format!(
                "{}_part{}.{}",
                self.upload_name,
                chunk.index,
                self.file.extension()
            ),
            mime_type: self.file.mime_type,
            chunk_index: chunk.index,
            total_chunks: self.total_chunks(),
        }
    }
}

/// Result of a successfully completed job.
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub transcript: String,
    /// Wall-clock duration of the whole job, rounded to two decimals.
    pub elapsed_secs: f64,
    pub chunk_count: u32,
    /// Endpoint the job finished on.
    pub endpoint: TargetEndpoint,
}

pub fn request_timeout(declared_duration_secs: u32) -> Duration {
    let scaled_ms = declared_duration_secs as u64 * TIMEOUT_PER_AUDIO_SECOND_MS;
    Duration::from_millis(scaled_ms.max(MIN_REQUEST_TIMEOUT_MS))
}

pub fn round_elapsed_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 100.0).round() / 100.0
}

fn build_upload_name(extension: &str) -> String {
    let stamp = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple().to_string();
    format!("{}_{}.{}", stamp, &token[..6], extension)
}

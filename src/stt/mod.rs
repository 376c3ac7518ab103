// src/stt/mod.rs
// Remote transcription endpoints

mod remote;
mod types;

pub use remote::HttpEndpoint;
pub use types::{ChunkTranscript, SttError};

use async_trait::async_trait;

/// One chunk's worth of upload fields, borrowed from the job.
#[derive(Debug, Clone)]
pub struct ChunkUpload<'a> {
    pub bytes: &'a [u8],
    pub file_name: String,
    pub mime_type: &'static str,
    pub chunk_index: u32,
    pub total_chunks: u32,
}

/// A transcription endpoint that accepts one chunk per request.
#[async_trait]
pub trait TranscribeEndpoint: Send + Sync {
    /// Upload one chunk and return its transcript.
    async fn transcribe_chunk(&self, upload: ChunkUpload<'_>) -> Result<ChunkTranscript, SttError>;

    /// Human-readable endpoint name for logs and error messages.
    fn name(&self) -> &str;
}

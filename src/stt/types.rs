// src/stt/types.rs
// Transcription wire types and error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transcription of a single uploaded chunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkTranscript {
    /// Transcribed text, already cleaned of engine artifacts.
    pub text: String,
}

/// Per-request failure classes surfaced to the caller.
#[derive(Debug, Error)]
pub enum SttError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("server error ({status}): {detail}")]
    Server { status: u16, detail: String },

    #[error("response missing transcription text")]
    MalformedResponse,

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl SttError {
    /// Returns true if retrying the same endpoint could still succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SttError::Network(_)
                | SttError::Timeout
                | SttError::Server { .. }
                | SttError::MalformedResponse
        )
    }
}

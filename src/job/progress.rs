use super::TargetEndpoint;
use serde::Serialize;
use std::fmt;

/// Status events surfaced to the caller while a job runs.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JobEvent {
    ChunkStarted {
        chunk_index: u32,
        total_chunks: u32,
        endpoint: TargetEndpoint,
    },
    ChunkRetrying {
        chunk_index: u32,
        attempt: u8,
        max_retries: u8,
    },
    FailingOver {
        chunk_index: u32,
    },
    ChunkCompleted {
        chunk_index: u32,
        text_len: usize,
    },
    JobCompleted {
        elapsed_secs: f64,
    },
}

impl fmt::Display for JobEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobEvent::ChunkStarted {
                chunk_index,
                total_chunks,
                endpoint,
            } => write!(
                f,
                "uploading chunk {} of {} to the {}...",
                chunk_index, total_chunks, endpoint
            ),
            JobEvent::ChunkRetrying {
                chunk_index,
                attempt,
                max_retries,
            } => write!(
                f,
                "retrying chunk {} ({}/{})...",
                chunk_index, attempt, max_retries
            ),
            JobEvent::FailingOver { .. } => write!(f, "falling back to secondary server..."),
            JobEvent::ChunkCompleted {
                chunk_index,
                text_len,
            } => write!(f, "chunk {} transcribed ({} chars)", chunk_index, text_len),
            JobEvent::JobCompleted { elapsed_secs } => {
                write!(f, "transcription finished in {:.2}s", elapsed_secs)
            }
        }
    }
}

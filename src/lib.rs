//! Chunked upload client for the GLY transcription backend.
//!
//! Large audio files are split into 5 MiB chunks and uploaded sequentially.
//! Each chunk is retried a bounded number of times against the current host;
//! when the primary host exhausts its retry budget the job fails over to the
//! secondary host for the remainder of the upload.

pub mod audio;
pub mod config;
pub mod job;
pub mod orchestrator;
pub mod stt;

use crate::job::{round_elapsed_secs, stitcher, JobEvent, JobOutcome, TargetEndpoint, UploadJob};
use crate::stt::{ChunkTranscript, ChunkUpload, SttError, TranscribeEndpoint};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::{mpsc, watch};

pub mod endpoint_registry;
pub mod metrics;
pub mod retry;

pub use endpoint_registry::endpoints_from_config;
pub use metrics::Metrics;
pub use retry::RetryPolicy;

/// Retry budget per chunk per endpoint.
pub const MAX_CHUNK_RETRIES: u8 = 2;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("upload cancelled")]
    Cancelled,

    #[error("chunk {chunk_index} failed on the {endpoint}: {source}")]
    ChunkFailed {
        chunk_index: u32,
        endpoint: TargetEndpoint,
        #[source]
        source: SttError,
    },
}

/// Drives one upload job: chunks strictly in order, one request in flight,
/// bounded retries per chunk, and a single sticky switch to the fallback
/// host when the primary exhausts its budget.
pub struct UploadOrchestrator {
    primary: Box<dyn TranscribeEndpoint>,
    fallback: Box<dyn TranscribeEndpoint>,
    retry_policy: RetryPolicy,
    metrics: Metrics,
    progress: Option<mpsc::UnboundedSender<JobEvent>>,
}

impl UploadOrchestrator {
    pub fn new(
        primary: Box<dyn TranscribeEndpoint>,
        fallback: Box<dyn TranscribeEndpoint>,
    ) -> Self {
        Self {
            primary,
            fallback,
            retry_policy: RetryPolicy::new(MAX_CHUNK_RETRIES),
            metrics: Metrics::new(),
            progress: None,
        }
    }

    pub fn with_progress(mut self, progress: mpsc::UnboundedSender<JobEvent>) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub async fn run(
        &mut self,
        job: &UploadJob,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<JobOutcome, JobError> {
        let started = Instant::now();
        let total_chunks = job.total_chunks();
        let mut target = TargetEndpoint::Primary;
        let mut texts: Vec<String> = Vec::with_capacity(job.chunks.len());

        for chunk in &job.chunks {
            let mut attempt: u8 = 0;

            loop {
                if *cancel.borrow() {
                    return Err(JobError::Cancelled);
                }

                self.emit(JobEvent::ChunkStarted {
                    chunk_index: chunk.index,
                    total_chunks,
                    endpoint: target,
                });

                let upload = job.chunk_upload(chunk);
                let result = tokio::select! {
                    result = try_endpoint(self.endpoint(target), upload, job.request_timeout) => result,
                    _ = cancelled(&mut cancel) => return Err(JobError::Cancelled),
                };

                match result {
                    Ok(transcript) => {
                        self.metrics.record_success(target.id());
                        self.emit(JobEvent::ChunkCompleted {
                            chunk_index: chunk.index,
                            text_len: transcript.text.len(),
                        });
                        texts.push(transcript.text);
                        break;
                    }
                    Err(e) => {
                        self.metrics.record_failure(target.id());
                        tracing::warn!(
                            "chunk {} attempt {} on {} failed: {}",
                            chunk.index,
                            attempt + 1,
                            self.endpoint(target).name(),
                            e
                        );

                        if self.retry_policy.should_retry(attempt, &e) {
                            self.emit(JobEvent::ChunkRetrying {
                                chunk_index: chunk.index,
                                attempt: attempt + 1,
                                max_retries: self.retry_policy.max_retries(),
                            });
                            tokio::select! {
                                _ = self.retry_policy.wait_before_retry(attempt) => {}
                                _ = cancelled(&mut cancel) => return Err(JobError::Cancelled),
                            }
                            attempt += 1;
                            continue;
                        }

                        if target == TargetEndpoint::Primary {
                            tracing::warn!(
                                "primary server exhausted on chunk {}, switching to fallback",
                                chunk.index
                            );
                            self.emit(JobEvent::FailingOver {
                                chunk_index: chunk.index,
                            });
                            target = TargetEndpoint::Fallback;
                            attempt = 0;
                            continue;
                        }

                        return Err(JobError::ChunkFailed {
                            chunk_index: chunk.index,
                            endpoint: target,
                            source: e,
                        });
                    }
                }
            }
        }

        let transcript = stitcher::stitch(&texts);
        let elapsed_secs = round_elapsed_secs(started.elapsed());
        self.emit(JobEvent::JobCompleted { elapsed_secs });
        tracing::info!(
            elapsed_secs,
            chunks = total_chunks,
            endpoint = target.id(),
            "upload job complete"
        );

        Ok(JobOutcome {
            transcript,
            elapsed_secs,
            chunk_count: total_chunks,
            endpoint: target,
        })
    }

    fn endpoint(&self, target: TargetEndpoint) -> &dyn TranscribeEndpoint {
        match target {
            TargetEndpoint::Primary => self.primary.as_ref(),
            TargetEndpoint::Fallback => self.fallback.as_ref(),
        }
    }

    fn emit(&self, event: JobEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event);
        }
    }
}

async fn try_endpoint(
    endpoint: &dyn TranscribeEndpoint,
    upload: ChunkUpload<'_>,
    timeout: Duration,
) -> Result<ChunkTranscript, SttError> {
    match tokio::time::timeout(timeout, endpoint.transcribe_chunk(upload)).await {
        Ok(result) => result,
        Err(_) => Err(SttError::Timeout),
    }
}

/// Resolves once cancellation is requested; pends forever if the cancel
/// channel closes without one, so a dropped sender never aborts a job.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

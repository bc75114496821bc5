//! Bounded ingestion of upload streams.
//!
//! Bytes are accumulated chunk by chunk; the moment the running total passes
//! the ceiling the partial buffer is released and ingestion fails, without
//! waiting for the rest of the stream.

use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use intake_core::{AppError, BoxError};
use tokio_util::sync::CancellationToken;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Upload exceeds the limit of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("No file selected")]
    Empty,

    #[error("Upload stream failed")]
    Stream(#[source] BoxError),

    #[error("Upload cancelled")]
    Cancelled,
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::TooLarge { limit } => AppError::FileTooLarge { limit },
            IngestError::Empty => AppError::Validation("No file selected".to_string()),
            IngestError::Stream(source) => AppError::UploadFailed {
                message: "Failed to read upload stream".to_string(),
                source: Some(source),
            },
            IngestError::Cancelled => AppError::UploadFailed {
                message: "Upload cancelled".to_string(),
                source: None,
            },
        }
    }
}

/// Streaming accumulator enforcing a byte budget.
#[derive(Debug)]
pub struct SizeGuard {
    limit: usize,
    received: usize,
    buffer: BytesMut,
}

impl SizeGuard {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            received: 0,
            buffer: BytesMut::new(),
        }
    }

    /// Total bytes observed so far.
    pub fn received(&self) -> usize {
        self.received
    }

    /// Append a chunk, failing as soon as the running total passes the limit.
    pub fn push(&mut self, chunk: &[u8]) -> Result<(), IngestError> {
        self.received = self.received.saturating_add(chunk.len());
        if self.received > self.limit {
            self.buffer = BytesMut::new();
            return Err(IngestError::TooLarge { limit: self.limit });
        }
        self.buffer.extend_from_slice(chunk);
        Ok(())
    }

    /// Complete ingestion, rejecting a stream that produced no bytes.
    pub fn finish(self) -> Result<Bytes, IngestError> {
        if self.received == 0 {
            return Err(IngestError::Empty);
        }
        Ok(self.buffer.freeze())
    }
}

/// Buffer an upload stream to completion under `limit` bytes.
pub async fn ingest<S, E>(stream: S, limit: usize) -> Result<Bytes, IngestError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    tokio::pin!(stream);
    let mut guard = SizeGuard::new(limit);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| IngestError::Stream(e.into()))?;
        guard.push(&chunk)?;
    }

    tracing::debug!(size_bytes = guard.received(), "Upload stream fully buffered");
    guard.finish()
}

/// Like [`ingest`], but abandons the stream (and its partial buffer) once
/// `cancel` fires.
pub async fn ingest_with_cancel<S, E>(
    stream: S,
    limit: usize,
    cancel: &CancellationToken,
) -> Result<Bytes, IngestError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Into<BoxError>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(IngestError::Cancelled),
        result = ingest(stream, limit) => result,
    }
}

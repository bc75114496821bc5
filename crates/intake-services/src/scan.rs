//! Malware scan coordination.
//!
//! The scanner runs on its own task and is raced against a fixed timeout.
//! Only an `Infected` verdict rejects an upload; a slow, failing or panicking
//! scanner degrades to [`ScanOutcome::Unavailable`] so the upload can still
//! be accepted into quarantine.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use intake_core::models::ScanResult;
use intake_core::AppError;
use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

/// How long a scan may run before the file is treated as unscannable.
pub const SCAN_TIMEOUT: Duration = Duration::from_secs(10);

const PLACEHOLDER_SCAN_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanVerdict {
    Clean,
    Infected(String),
}

/// A malware scanning backend.
#[async_trait]
pub trait VirusScanner: Send + Sync {
    async fn scan(&self, data: Bytes) -> anyhow::Result<ScanVerdict>;
}

/// Stand-in for a real engine: reports clean after a short delay.
#[derive(Debug, Clone)]
pub struct PlaceholderScanner {
    delay: Duration,
}

impl PlaceholderScanner {
    pub fn new() -> Self {
        Self {
            delay: PLACEHOLDER_SCAN_DELAY,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for PlaceholderScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VirusScanner for PlaceholderScanner {
    async fn scan(&self, _data: Bytes) -> anyhow::Result<ScanVerdict> {
        tokio::time::sleep(self.delay).await;
        Ok(ScanVerdict::Clean)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Clean,
    Infected(String),
    Unavailable,
}

impl ScanOutcome {
    pub fn scan_result(&self) -> ScanResult {
        match self {
            ScanOutcome::Clean => ScanResult::Clean,
            ScanOutcome::Infected(_) => ScanResult::Infected,
            ScanOutcome::Unavailable => ScanResult::ScanUnavailable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Scan cancelled")]
pub struct ScanCancelled;

impl From<ScanCancelled> for AppError {
    fn from(_: ScanCancelled) -> Self {
        AppError::UploadFailed {
            message: "Upload cancelled".to_string(),
            source: None,
        }
    }
}

struct AbortOnDrop(AbortHandle);

impl Drop for AbortOnDrop {
    fn drop(&mut self) {
        self.0.abort();
    }
}

#[derive(Clone)]
pub struct ScanCoordinator {
    scanner: Arc<dyn VirusScanner>,
    timeout: Duration,
}

impl ScanCoordinator {
    pub fn new(scanner: Arc<dyn VirusScanner>) -> Self {
        Self {
            scanner,
            timeout: SCAN_TIMEOUT,
        }
    }

    pub async fn scan(&self, data: Bytes) -> ScanOutcome {
        self.scan_with_cancel(data, &CancellationToken::new())
            .await
            .unwrap_or(ScanOutcome::Unavailable)
    }

    /// Race the scanner against the timeout; the losing side is discarded.
    pub async fn scan_with_cancel(
        &self,
        data: Bytes,
        cancel: &CancellationToken,
    ) -> Result<ScanOutcome, ScanCancelled> {
        let start = Instant::now();
        let size_bytes = data.len();
        tracing::debug!(size_bytes, "Starting malware scan");

        let scanner = Arc::clone(&self.scanner);
        let handle = tokio::spawn(async move { scanner.scan(data).await });
        let _abort = AbortOnDrop(handle.abort_handle());

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::info!("Malware scan cancelled");
                return Err(ScanCancelled);
            }
            result = tokio::time::timeout(self.timeout, handle) => result,
        };

        let outcome = match result {
            Ok(Ok(Ok(ScanVerdict::Clean))) => {
                tracing::debug!(
                    duration_ms = start.elapsed().as_millis(),
                    "Malware scan completed: clean"
                );
                ScanOutcome::Clean
            }
            Ok(Ok(Ok(ScanVerdict::Infected(signature)))) => {
                tracing::warn!(
                    duration_ms = start.elapsed().as_millis(),
                    signature = %signature,
                    "Malware scan detected a threat"
                );
                ScanOutcome::Infected(signature)
            }
            Ok(Ok(Err(e))) => {
                tracing::warn!(error = %e, "Malware scan failed, file will be quarantined");
                ScanOutcome::Unavailable
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    "Malware scan task join error, file will be quarantined"
                );
                ScanOutcome::Unavailable
            }
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.timeout.as_secs(),
                    "Malware scan timed out, file will be quarantined"
                );
                ScanOutcome::Unavailable
            }
        };

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FixedScanner(anyhow::Result<ScanVerdict>);

    #[async_trait]
    impl VirusScanner for FixedScanner {
        async fn scan(&self, _data: Bytes) -> anyhow::Result<ScanVerdict> {
            match &self.0 {
                Ok(verdict) => Ok(verdict.clone()),
                Err(e) => Err(anyhow::anyhow!("{}", e)),
            }
        }
    }

    struct PanickingScanner;

    #[async_trait]
    impl VirusScanner for PanickingScanner {
        async fn scan(&self, _data: Bytes) -> anyhow::Result<ScanVerdict> {
            panic!("scanner exploded");
        }
    }

    /// Records whether the scan ran to completion.
    struct SlowScanner {
        finished: Arc<AtomicBool>,
    }

    #[async_trait]
    impl VirusScanner for SlowScanner {
        async fn scan(&self, _data: Bytes) -> anyhow::Result<ScanVerdict> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            self.finished.store(true, Ordering::SeqCst);
            Ok(ScanVerdict::Clean)
        }
    }

    fn coordinator(scanner: impl VirusScanner + 'static) -> ScanCoordinator {
        ScanCoordinator::new(Arc::new(scanner))
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_scan_is_clean_after_delay() {
        let start = tokio::time::Instant::now();
        let outcome = coordinator(PlaceholderScanner::new())
            .scan(Bytes::from_static(b"%PDF-1.4"))
            .await;
        assert_eq!(outcome, ScanOutcome::Clean);
        assert_eq!(outcome.scan_result(), ScanResult::Clean);
        assert!(start.elapsed() >= PLACEHOLDER_SCAN_DELAY);
        assert!(start.elapsed() < SCAN_TIMEOUT);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_scan_times_out_as_unavailable() {
        let finished = Arc::new(AtomicBool::new(false));
        let start = tokio::time::Instant::now();
        let outcome = coordinator(SlowScanner {
            finished: Arc::clone(&finished),
        })
        .scan(Bytes::new())
        .await;

        assert_eq!(outcome, ScanOutcome::Unavailable);
        assert_eq!(outcome.scan_result(), ScanResult::ScanUnavailable);
        assert!(start.elapsed() >= SCAN_TIMEOUT);

        // The losing scan is aborted rather than left running.
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(!finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_scanner_error_is_unavailable() {
        let outcome = coordinator(FixedScanner(Err(anyhow::anyhow!("engine offline"))))
            .scan(Bytes::new())
            .await;
        assert_eq!(outcome, ScanOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_scanner_panic_is_unavailable() {
        let outcome = coordinator(PanickingScanner).scan(Bytes::new()).await;
        assert_eq!(outcome, ScanOutcome::Unavailable);
    }

    #[tokio::test]
    async fn test_infected_verdict_is_reported() {
        let outcome = coordinator(FixedScanner(Ok(ScanVerdict::Infected(
            "Eicar-Test-Signature".to_string(),
        ))))
        .scan(Bytes::new())
        .await;
        assert_eq!(outcome, ScanOutcome::Infected("Eicar-Test-Signature".to_string()));
        assert_eq!(outcome.scan_result(), ScanResult::Infected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_scan_returns_error() {
        let cancel = CancellationToken::new();
        let scan = coordinator(PlaceholderScanner::with_delay(Duration::from_secs(5)));
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.cancel();
        });
        let result = scan.scan_with_cancel(Bytes::new(), &cancel).await;
        assert_eq!(result, Err(ScanCancelled));
    }
}

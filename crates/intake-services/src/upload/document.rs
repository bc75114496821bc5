use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use futures::Stream;
use intake_core::models::{
    parse_asset_id, CancelResponse, DeclaredFile, DocumentAsset, DocumentAssetResponse,
    LifecycleState, ScanResult,
};
use intake_core::{AppError, BoxError};
use intake_processing::{analyze_pdf, ingest_with_cancel, validate_signature, FileFormat};
use intake_storage::RecordStore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::scan::{ScanCoordinator, ScanOutcome};
use crate::token::AccessTokenIssuer;

/// PDF upload pipeline.
///
/// At most one document upload runs at a time per store. The slot is claimed
/// before any request bytes are read and is released on every exit path,
/// including when the upload future is dropped.
#[derive(Clone)]
pub struct DocumentUploadService {
    store: Arc<RecordStore<DocumentAsset>>,
    scanner: Option<ScanCoordinator>,
    tokens: Arc<dyn AccessTokenIssuer>,
    max_size: usize,
}

impl DocumentUploadService {
    /// `scanner: None` stores documents as `unscanned`.
    pub fn new(
        store: Arc<RecordStore<DocumentAsset>>,
        scanner: Option<ScanCoordinator>,
        tokens: Arc<dyn AccessTokenIssuer>,
        max_size: usize,
    ) -> Self {
        Self {
            store,
            scanner,
            tokens,
            max_size,
        }
    }

    pub fn store(&self) -> &Arc<RecordStore<DocumentAsset>> {
        &self.store
    }

    pub fn scanning_enabled(&self) -> bool {
        self.scanner.is_some()
    }

    pub async fn upload<S, E>(
        &self,
        declared: DeclaredFile,
        stream: S,
    ) -> Result<DocumentAssetResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        self.upload_with_cancel(declared, stream, &CancellationToken::new())
            .await
    }

    pub async fn upload_with_cancel<S, E>(
        &self,
        declared: DeclaredFile,
        stream: S,
        cancel: &CancellationToken,
    ) -> Result<DocumentAssetResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        let id = Uuid::new_v4();
        let gate = self.store.begin_upload(id).map_err(|e| {
            tracing::debug!("Rejecting document upload, another is in flight");
            AppError::from(e)
        })?;
        tracing::debug!(
            asset_id = %id,
            state = ?LifecycleState::Accepted,
            file_name = %declared.original_name,
            "Document upload accepted"
        );

        let result = self.run_pipeline(id, declared, stream, cancel).await;

        match &result {
            Ok(response) => tracing::info!(
                asset_id = %id,
                size_bytes = response.size_bytes,
                scan_result = ?response.scan_result,
                quarantined = response.quarantined,
                state = ?LifecycleState::Completed,
                "Document upload completed"
            ),
            Err(e) if cancel.is_cancelled() => tracing::info!(
                asset_id = %id,
                error = %e,
                state = ?LifecycleState::Cancelled,
                "Document upload cancelled"
            ),
            Err(e) => tracing::debug!(
                asset_id = %id,
                error = %e,
                state = ?LifecycleState::Failed,
                "Document upload failed"
            ),
        }

        drop(gate);
        result
    }

    async fn run_pipeline<S, E>(
        &self,
        id: Uuid,
        declared: DeclaredFile,
        stream: S,
        cancel: &CancellationToken,
    ) -> Result<DocumentAssetResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>>,
        E: Into<BoxError>,
    {
        tracing::debug!(asset_id = %id, state = ?LifecycleState::InProgress, "Receiving document");
        let data = ingest_with_cancel(stream, self.max_size, cancel).await?;

        validate_signature(&data, FileFormat::Pdf)?;
        analyze_pdf(&data).into_result()?;

        let scan_result = match &self.scanner {
            None => ScanResult::Unscanned,
            Some(scanner) => match scanner.scan_with_cancel(data.clone(), cancel).await? {
                ScanOutcome::Clean => ScanResult::Clean,
                ScanOutcome::Unavailable => ScanResult::ScanUnavailable,
                ScanOutcome::Infected(signature) => {
                    return Err(AppError::MalwareDetected(signature));
                }
            },
        };

        let document = DocumentAsset {
            id,
            original_name: declared.original_name,
            declared_mime_type: declared.declared_mime_type,
            size_bytes: data.len(),
            received_at: Utc::now(),
            integrity_valid: true,
            corruption_kind: None,
            scan_result,
            access_token: self.tokens.issue(id),
            lifecycle_state: LifecycleState::Completed,
            raw_bytes: data,
        };
        let response = DocumentAssetResponse::from(&document);

        if scan_result.requires_quarantine() {
            self.store.add_to_quarantine(document)?;
            tracing::warn!(asset_id = %id, "Document quarantined, malware scan unavailable");
        } else {
            self.store.add(document)?;
        }

        Ok(response)
    }

    pub fn get(&self, raw_id: &str) -> Result<DocumentAssetResponse, AppError> {
        let id = parse_asset_id(raw_id)?;
        self.store
            .get_by_id(id)
            .map(|doc| DocumentAssetResponse::from(&doc))
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))
    }

    /// Remove a stored document from whichever partition holds it.
    pub fn cancel(&self, raw_id: &str) -> Result<CancelResponse, AppError> {
        let id = parse_asset_id(raw_id)?;
        self.store
            .delete(id)
            .ok_or_else(|| AppError::NotFound("Document not found".to_string()))?;

        tracing::info!(asset_id = %id, "Document removed");
        Ok(CancelResponse {
            id,
            message: "Document upload cancelled".to_string(),
        })
    }
}

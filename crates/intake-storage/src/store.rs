//! Bounded in-memory record store
//!
//! One mutex per store guards both partitions and the in-flight gate, so
//! capacity checks and gate transitions are atomic with respect to
//! concurrent callers.

use std::collections::HashMap;

use intake_core::AppError;
use parking_lot::Mutex;
use thiserror::Error;
use uuid::Uuid;

use crate::record::Record;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store capacity of {capacity} records exceeded")]
    CapacityExceeded { capacity: usize },

    #[error("Quarantine capacity of {capacity} records exceeded")]
    QuarantineCapacityExceeded { capacity: usize },

    #[error("Store has no quarantine partition")]
    QuarantineUnsupported,

    #[error("An upload is already in progress")]
    UploadInProgress,
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UploadInProgress => AppError::UploadInProgress,
            other => AppError::upload_failed("Failed to store upload", other),
        }
    }
}

#[derive(Debug)]
struct Inner<T> {
    primary: HashMap<Uuid, T>,
    quarantine: Option<HashMap<Uuid, T>>,
    in_flight: Option<Uuid>,
}

#[derive(Debug)]
pub struct RecordStore<T> {
    capacity: usize,
    inner: Mutex<Inner<T>>,
}

impl<T: Record> RecordStore<T> {
    /// Store with a primary partition only.
    pub fn new(capacity: usize) -> Self {
        Self::build(capacity, None)
    }

    /// Store with both a primary and a quarantine partition.
    pub fn with_quarantine(capacity: usize) -> Self {
        Self::build(capacity, Some(HashMap::new()))
    }

    fn build(capacity: usize, quarantine: Option<HashMap<Uuid, T>>) -> Self {
        Self {
            capacity,
            inner: Mutex::new(Inner {
                primary: HashMap::new(),
                quarantine,
                in_flight: None,
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn add(&self, record: T) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        if inner.primary.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "Record store is full");
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        inner.primary.insert(record.id(), record);
        Ok(())
    }

    pub fn add_to_quarantine(&self, record: T) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let quarantine = inner
            .quarantine
            .as_mut()
            .ok_or(StoreError::QuarantineUnsupported)?;
        if quarantine.len() >= self.capacity {
            tracing::warn!(capacity = self.capacity, "Quarantine partition is full");
            return Err(StoreError::QuarantineCapacityExceeded {
                capacity: self.capacity,
            });
        }
        quarantine.insert(record.id(), record);
        Ok(())
    }

    /// Primary partition first, then quarantine.
    pub fn get_by_id(&self, id: Uuid) -> Option<T> {
        let inner = self.inner.lock();
        inner
            .primary
            .get(&id)
            .or_else(|| inner.quarantine.as_ref().and_then(|q| q.get(&id)))
            .cloned()
    }

    pub fn is_quarantined(&self, id: Uuid) -> bool {
        self.inner
            .lock()
            .quarantine
            .as_ref()
            .is_some_and(|q| q.contains_key(&id))
    }

    /// Remove the record from whichever partition holds it.
    pub fn delete(&self, id: Uuid) -> Option<T> {
        let mut inner = self.inner.lock();
        if let Some(record) = inner.primary.remove(&id) {
            return Some(record);
        }
        inner.quarantine.as_mut().and_then(|q| q.remove(&id))
    }

    pub fn exists(&self, id: Uuid) -> bool {
        let inner = self.inner.lock();
        inner.primary.contains_key(&id)
            || inner
                .quarantine
                .as_ref()
                .is_some_and(|q| q.contains_key(&id))
    }

    /// Records across all partitions.
    pub fn count(&self) -> usize {
        let inner = self.inner.lock();
        inner.primary.len() + inner.quarantine.as_ref().map_or(0, HashMap::len)
    }

    pub fn quarantine_count(&self) -> usize {
        self.inner.lock().quarantine.as_ref().map_or(0, HashMap::len)
    }

    pub fn has_upload_in_progress(&self) -> bool {
        self.inner.lock().in_flight.is_some()
    }

    pub fn upload_in_progress(&self) -> Option<Uuid> {
        self.inner.lock().in_flight
    }

    pub fn set_upload_in_progress(&self, id: Uuid) {
        self.inner.lock().in_flight = Some(id);
    }

    pub fn clear_upload_in_progress(&self) {
        self.inner.lock().in_flight = None;
    }

    /// Atomically claim the in-flight slot for `id`.
    ///
    /// The slot is released when the returned guard is dropped, including
    /// when the owning future is dropped mid-upload.
    pub fn begin_upload(&self, id: Uuid) -> StoreResult<UploadGate<'_, T>> {
        let mut inner = self.inner.lock();
        if inner.in_flight.is_some() {
            return Err(StoreError::UploadInProgress);
        }
        inner.in_flight = Some(id);
        Ok(UploadGate { store: self, id })
    }
}

/// Holds a store's in-flight slot until dropped.
#[must_use = "the in-flight slot is released as soon as the gate is dropped"]
#[derive(Debug)]
pub struct UploadGate<'a, T> {
    store: &'a RecordStore<T>,
    id: Uuid,
}

impl<T> UploadGate<'_, T> {
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl<T> Drop for UploadGate<'_, T> {
    fn drop(&mut self) {
        let mut inner = self.store.inner.lock();
        if inner.in_flight == Some(self.id) {
            inner.in_flight = None;
        }
    }
}

use intake_core::models::{DocumentAsset, ImageAsset};
use uuid::Uuid;

/// A value that can be kept in a [`RecordStore`](crate::RecordStore).
pub trait Record: Clone + Send + Sync {
    fn id(&self) -> Uuid;
}

impl Record for ImageAsset {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl Record for DocumentAsset {
    fn id(&self) -> Uuid {
        self.id
    }
}

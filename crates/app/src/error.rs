use thiserror::Error;

use credit_tracker_core::DomainError;
use credit_tracker_export::ExportError;
use credit_tracker_store::StoreError;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

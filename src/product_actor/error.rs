use thiserror::Error;

use crate::actor_framework::FrameworkError;
use crate::domain::ProductId;

/// Outcomes of product operations other than success.
///
/// `NotFound` and `VersionConflict` are expected and left to the caller to
/// act on. `Internal` means a collaborator failed where it should not have.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProductError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Version conflict: stored version is {current}, request claimed {claimed}")]
    VersionConflict { current: u64, claimed: u64 },
    #[error("Internal failure: {0}")]
    Internal(String),
}

impl ProductError {
    /// Translates a store failure for the product `id`.
    pub fn from_store(id: ProductId, err: FrameworkError) -> Self {
        match err {
            FrameworkError::NotFound(_) => ProductError::NotFound(id),
            other => ProductError::Internal(other.to_string()),
        }
    }
}

//! Crate-level error types

use thiserror::Error;

/// Result type for workbench operations
pub type Result<T> = std::result::Result<T, WorkbenchError>;

/// Errors surfaced by the workbench
#[derive(Error, Debug)]
pub enum WorkbenchError {
    /// Backend API error
    #[error("API error: {0}")]
    Api(#[from] crate::client::ApiError),

    /// Draft/history store error
    #[error("Store error: {0}")]
    Store(#[from] crate::store::StoreError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

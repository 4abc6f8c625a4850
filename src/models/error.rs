use super::ids::CellId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotebookError>;

#[derive(Debug, Error)]
pub enum NotebookError {
    #[error("index {index} out of range for {len} cells")]
    OutOfRange { index: usize, len: usize },
    #[error("cell not found: {0}")]
    NotFound(CellId),
    #[error("notebook is read-only; use save-as")]
    ReadOnlyViolation,
    #[error("notebook has never been saved; use save-as")]
    NeverSaved,
    #[error(transparent)]
    Document(#[from] DocumentError),
}

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid notebook json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported notebook version {0}")]
    UnsupportedVersion(u64),
    #[error("notebook document must be a json object")]
    NotAnObject,
}

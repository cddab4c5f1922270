use thiserror::Error;

use crate::api::ApiError;
use crate::preview::PreviewError;

#[derive(Debug, Error)]
pub enum ProofctlError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Nothing to edit. Provide at least one content field.")]
    NothingToEdit,

    #[error("Nothing to record. Provide at least one performance metric.")]
    NoMetrics,

    #[error("{}", .0.message())]
    Api(#[from] ApiError),

    #[error(transparent)]
    Preview(#[from] PreviewError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

use thiserror::Error;

use crate::artifact::InferenceError;
use crate::registry::ModelName;

/// Request-time failures. The HTTP layer maps these to status codes in one
/// place, see `api_server::errors`.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0} model is not loaded")]
    ModelUnavailable(ModelName),

    #[error("{model} inference failed: {source}")]
    Inference {
        model: ModelName,
        #[source]
        source: InferenceError,
    },
}

impl From<common::calendar::DateError> for GatewayError {
    fn from(e: common::calendar::DateError) -> Self {
        GatewayError::InvalidArgument(format!("Format tanggal tidak valid: {e}"))
    }
}

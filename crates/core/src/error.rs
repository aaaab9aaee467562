use crate::types::ContractId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: ContractId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Short operator-facing title shown above the underlying message.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "Contract not found",
            Self::Validation(_) => "Invalid contract details",
            Self::Storage(_) => "Failed to Save Contract",
            Self::Upload(_) => "Document upload failed",
            Self::Internal(_) => "Something went wrong",
        }
    }

    /// The message without the variant prefix, suitable for display.
    pub fn detail(&self) -> String {
        match self {
            Self::NotFound { entity, id } => format!("{entity} with id {id} not found"),
            Self::Validation(msg)
            | Self::Storage(msg)
            | Self::Upload(msg)
            | Self::Internal(msg) => msg.clone(),
        }
    }
}

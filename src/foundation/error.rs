use crate::packer::block::BlockId;

/// Convenience result type used across folio.
pub type FolioResult<T> = Result<T, FolioError>;

/// Top-level error taxonomy used by packer and bridge APIs.
#[derive(thiserror::Error, Debug)]
pub enum FolioError {
    /// Invalid user-provided configuration or block data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A block id was queued twice while the strict id policy is active.
    #[error("duplicate block id: {id}")]
    DuplicateId {
        /// The offending id.
        id: BlockId,
    },

    /// Errors raised while building or mutating the simulation world.
    #[error("physics error: {0}")]
    Physics(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FolioError {
    /// Build a [`FolioError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FolioError::DuplicateId`] value.
    pub fn duplicate_id(id: BlockId) -> Self {
        Self::DuplicateId { id }
    }

    /// Build a [`FolioError::Physics`] value.
    pub fn physics(msg: impl Into<String>) -> Self {
        Self::Physics(msg.into())
    }

    /// Build a [`FolioError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(value: serde_json::Error) -> Self {
        Self::serde(value.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;

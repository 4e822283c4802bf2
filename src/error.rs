use thiserror::Error;

/// Domain failures surfaced to callers. Store and I/O failures travel as
/// `anyhow::Error` instead.
#[derive(Debug, Error)]
pub enum HybridError {
    #[error("Missing required column '{0}'")]
    MissingColumn(String),

    #[error("Invalid row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("Parent '{0}' not found in any record")]
    ParentNotFound(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Session '{0}' not found or expired")]
    SessionNotFound(String),
}

impl HybridError {
    /// Input-format errors come from malformed uploads.
    pub fn is_input_format(&self) -> bool {
        matches!(self, Self::MissingColumn(_) | Self::InvalidRow { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ParentNotFound(_) | Self::SessionNotFound(_))
    }
}

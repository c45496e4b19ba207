use thiserror::Error;

/// Errors surfaced by a document session.
///
/// Load failures and not-found are terminal for the session; save and share
/// failures are recoverable (the affected stream stays dirty and the next
/// edit or an explicit resubmit retries).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Failed to load document: {0}")]
    LoadFailure(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Failed to save document: {0}")]
    SaveFailure(String),

    #[error("Failed to share document: {0}")]
    ShareFailure(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(&'static str),

    #[error("Invalid email address: '{0}'")]
    InvalidAddress(String),
}

impl SessionError {
    /// Whether the session can continue after this error
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            SessionError::LoadFailure(_) | SessionError::NotFound(_)
        )
    }
}

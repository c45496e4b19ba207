use std::fmt;

/// Combined save indicator covering both the title and content streams.
///
/// While either stream has an armed debounce timer or an in-flight
/// persistence call the status reads `Pending`; it returns to `Saved` only
/// once all pending and in-flight work for both streams has completed
/// successfully. The most recent outcome wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveStatus {
    Saved,
    Pending,
    Error(String),
}

impl SaveStatus {
    /// Returns true while unsaved work exists
    pub fn is_pending(&self) -> bool {
        matches!(self, SaveStatus::Pending)
    }

    /// Returns true if the last settled flush failed
    pub fn is_error(&self) -> bool {
        matches!(self, SaveStatus::Error(_))
    }

    /// Returns the error message if in error state
    pub fn error_message(&self) -> Option<&str> {
        match self {
            SaveStatus::Error(msg) => Some(msg.as_str()),
            _ => None,
        }
    }
}

impl Default for SaveStatus {
    fn default() -> Self {
        SaveStatus::Saved
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveStatus::Saved => write!(f, "Saved"),
            SaveStatus::Pending => write!(f, "Saving..."),
            SaveStatus::Error(msg) => write!(f, "{}", msg),
        }
    }
}

/// Strict linear load sequence of a document session.
///
/// Exactly one of these is rendered at any time: loading → {failed |
/// not-found | ready}. Failures here are terminal; the user navigates away.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Failed(String),
    NotFound,
    Ready,
}

impl LoadState {
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, LoadState::Failed(_) | LoadState::NotFound)
    }
}

impl From<&crate::models::SessionError> for LoadState {
    fn from(e: &crate::models::SessionError) -> Self {
        match e {
            crate::models::SessionError::NotFound(_) => LoadState::NotFound,
            other => LoadState::Failed(other.to_string()),
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Loading => write!(f, "Loading..."),
            LoadState::Failed(msg) => write!(f, "Error: {}", msg),
            LoadState::NotFound => write!(f, "Document not found"),
            LoadState::Ready => write!(f, "Ready"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_status_default_is_saved() {
        assert_eq!(SaveStatus::default(), SaveStatus::Saved);
    }

    #[test]
    fn save_status_predicates() {
        assert!(SaveStatus::Pending.is_pending());
        assert!(!SaveStatus::Saved.is_pending());
        assert!(SaveStatus::Error("Error saving".into()).is_error());
        assert_eq!(
            SaveStatus::Error("Error saving".into()).error_message(),
            Some("Error saving")
        );
        assert_eq!(SaveStatus::Saved.error_message(), None);
    }

    #[test]
    fn save_status_rendered_forms() {
        assert_eq!(SaveStatus::Saved.to_string(), "Saved");
        assert_eq!(SaveStatus::Pending.to_string(), "Saving...");
        assert_eq!(SaveStatus::Error("Error saving".into()).to_string(), "Error saving");
    }

    #[test]
    fn load_state_rendered_forms() {
        assert_eq!(LoadState::Loading.to_string(), "Loading...");
        assert_eq!(
            LoadState::Failed("Failed to load document".into()).to_string(),
            "Error: Failed to load document"
        );
        assert_eq!(LoadState::NotFound.to_string(), "Document not found");
    }

    #[test]
    fn load_failures_are_terminal() {
        assert!(LoadState::Failed("x".into()).is_terminal_failure());
        assert!(LoadState::NotFound.is_terminal_failure());
        assert!(!LoadState::Loading.is_terminal_failure());
        assert!(!LoadState::Ready.is_terminal_failure());
    }
}

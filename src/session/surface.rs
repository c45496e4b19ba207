use std::fmt;

/// Contract of the rich-text editing surface the coordinator drives.
///
/// The surface owns the live document buffer. The coordinator never inspects
/// intermediate states; it reads `snapshot()` only when a flush fires, and
/// calls `replace_content` once at bootstrap. The surface's change
/// notification is delivered by the embedding layer calling
/// [`SessionCoordinator::on_content_changed`](crate::session::SessionCoordinator::on_content_changed).
pub trait EditingSurface: Send + Sync {
    /// Full current content in the surface's native JSON representation
    fn snapshot(&self) -> serde_json::Value;

    /// Enable or disable user input on the surface
    fn set_editable(&self, editable: bool);

    /// Replace the whole buffer; bootstrap only
    fn replace_content(&self, content: serde_json::Value);

    /// Move the cursor to the end of the buffer at session start
    fn focus_end(&self) {}
}

/// Whether a realtime channel is attached to the editing surface.
///
/// With a channel attached the channel supplies the surface's initial state,
/// so the coordinator skips the local content bootstrap. The channel itself
/// is opaque to the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Standalone,
    Realtime,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Standalone => write!(f, "standalone"),
            SyncMode::Realtime => write!(f, "realtime"),
        }
    }
}

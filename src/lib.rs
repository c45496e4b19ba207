//! Session coordination layer for the colabri document editor.
//!
//! The editor widget, the realtime channel and the document API are external
//! collaborators; this crate owns what sits between them: dirty tracking and
//! trailing-edge debounced persistence for the title and content streams,
//! the combined save-status indicator, permission-gated editability and
//! collaborator reconciliation on share.
//!
//! A presentation layer opens a [`SessionCoordinator`] per document and
//! forwards surface events to it:
//!
//! ```no_run
//! # async fn demo() -> Result<(), colabri_session::SessionError> {
//! use colabri_session::{
//!     HttpPersistenceClient, SessionConfig, SessionCoordinator, SyncMode,
//! };
//! # use colabri_session::EditingSurface;
//! # struct Surface;
//! # impl EditingSurface for Surface {
//! #     fn snapshot(&self) -> serde_json::Value { serde_json::Value::Null }
//! #     fn set_editable(&self, _: bool) {}
//! #     fn replace_content(&self, _: serde_json::Value) {}
//! # }
//!
//! let config = SessionConfig::load().unwrap_or_default();
//! let client = HttpPersistenceClient::new(&config)?;
//! let session =
//!     SessionCoordinator::open("doc-1", client, Surface, SyncMode::Standalone, config).await?;
//!
//! session.on_title_changed("New title")?;
//! session.on_content_changed()?;
//! println!("{}", session.status());
//! # Ok(())
//! # }
//! ```

pub mod clients;
pub mod config;
pub mod models;
pub mod session;

pub use clients::{HttpPersistenceClient, PersistenceClient};
pub use config::{ConfigError, SessionConfig};
pub use models::{
    Collaborator, Document, DocumentOwner, DocumentUpdate, PermissionLevel, SessionError,
    SharePermission, ShareRequest,
};
pub use session::{
    EditingSurface, LoadState, SaveStatus, SessionCoordinator, ShareOutcome, SyncMode,
};

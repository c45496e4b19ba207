use serde::{Deserialize, Serialize};
use std::fmt;

/// Permission level the current user holds on a document
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    Owner,
    Write,
    Read,
}

impl PermissionLevel {
    /// Whether this level allows mutating the document content
    pub fn can_edit(self) -> bool {
        matches!(self, PermissionLevel::Owner | PermissionLevel::Write)
    }

    /// Whether this level allows renaming the document and issuing shares
    pub fn can_share(self) -> bool {
        matches!(self, PermissionLevel::Owner)
    }
}

impl Default for PermissionLevel {
    // Least privilege when the backend omits the field
    fn default() -> Self {
        PermissionLevel::Read
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionLevel::Owner => write!(f, "owner"),
            PermissionLevel::Write => write!(f, "write"),
            PermissionLevel::Read => write!(f, "read"),
        }
    }
}

/// Permission level a share may grant (owner is never grantable)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SharePermission {
    Read,
    Write,
}

impl fmt::Display for SharePermission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SharePermission::Read => write!(f, "read"),
            SharePermission::Write => write!(f, "write"),
        }
    }
}

/// The document owner as reported by the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentOwner {
    pub name: String,
    pub email: String,
}

/// One entry in a document's collaborator set, unique by email
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collaborator {
    pub email: String,
    pub permission: SharePermission,
}

/// A document resource as fetched from the backend.
///
/// `content` is the editing surface's native JSON representation and may be
/// absent for title-only documents. `current_user_permission` defaults to
/// read when the backend omits it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<DocumentOwner>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub current_user_permission: PermissionLevel,
}

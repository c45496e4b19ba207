use crate::models::SharePermission;
use serde::{Deserialize, Serialize};

/// Partial-update payload for a document.
///
/// The coordinator flushes title and content as independent calls, so exactly
/// one field is set per request; the backend never sees both combined.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
}

impl DocumentUpdate {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            content: None,
        }
    }

    pub fn content(content: serde_json::Value) -> Self {
        Self {
            title: None,
            content: Some(content),
        }
    }
}

/// Request body for sharing a document with another user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRequest {
    pub email: String,
    pub permission: SharePermission,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_update_serializes_only_the_title() {
        let body = serde_json::to_value(DocumentUpdate::title("New title")).unwrap();
        assert_eq!(body, serde_json::json!({"title": "New title"}));
    }

    #[test]
    fn content_update_serializes_only_the_content() {
        let snapshot = serde_json::json!({"type": "doc", "content": []});
        let body = serde_json::to_value(DocumentUpdate::content(snapshot.clone())).unwrap();
        assert_eq!(body, serde_json::json!({"content": snapshot}));
    }
}

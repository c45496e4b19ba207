use crate::config::SessionConfig;
use crate::models::{Document, DocumentUpdate, SessionError, ShareRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error};

/// Backend contract consumed by the session coordinator.
///
/// `fetch_document` returns `Ok(None)` for a missing document so the caller
/// can distinguish not-found from transport failure. Title and content
/// updates arrive as independent partial-update calls and are never combined
/// server-side.
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    async fn fetch_document(&self, id: &str) -> Result<Option<Document>, SessionError>;

    async fn update_document(&self, id: &str, update: DocumentUpdate)
        -> Result<(), SessionError>;

    async fn share_document(&self, id: &str, request: ShareRequest) -> Result<(), SessionError>;
}

/// HTTP implementation of [`PersistenceClient`] against the colabri app API
#[derive(Debug)]
pub struct HttpPersistenceClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpPersistenceClient {
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SessionError::LoadFailure(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/api/documents/{}", self.base_url, id)
    }

    fn with_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.header("Authorization", format!("Bearer {}", token)),
            None => request,
        }
    }
}

#[async_trait]
impl PersistenceClient for HttpPersistenceClient {
    async fn fetch_document(&self, id: &str) -> Result<Option<Document>, SessionError> {
        let url = self.document_url(id);
        debug!("Fetching document from {}", url);

        let response = self
            .with_auth(self.client.get(&url))
            .send()
            .await
            .map_err(|e| SessionError::LoadFailure(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            error!("Document fetch failed with status {}", response.status());
            return Err(SessionError::LoadFailure(format!(
                "Unexpected status {}",
                response.status()
            )));
        }

        // The API can answer a success with a null body; treat that the same
        // as a 404.
        let document: Option<Document> = response
            .json()
            .await
            .map_err(|e| SessionError::LoadFailure(format!("Invalid response body: {}", e)))?;
        Ok(document)
    }

    async fn update_document(
        &self,
        id: &str,
        update: DocumentUpdate,
    ) -> Result<(), SessionError> {
        let url = self.document_url(id);

        let response = self
            .with_auth(self.client.put(&url))
            .json(&update)
            .send()
            .await
            .map_err(|e| SessionError::SaveFailure(e.to_string()))?;

        if !response.status().is_success() {
            error!("Document update failed with status {}", response.status());
            return Err(SessionError::SaveFailure(format!(
                "Unexpected status {}",
                response.status()
            )));
        }
        Ok(())
    }

    async fn share_document(&self, id: &str, request: ShareRequest) -> Result<(), SessionError> {
        let url = format!("{}/share", self.document_url(id));

        let response = self
            .with_auth(self.client.post(&url))
            .json(&request)
            .send()
            .await
            .map_err(|e| SessionError::ShareFailure(e.to_string()))?;

        if !response.status().is_success() {
            error!("Document share failed with status {}", response.status());
            return Err(SessionError::ShareFailure(format!(
                "Unexpected status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

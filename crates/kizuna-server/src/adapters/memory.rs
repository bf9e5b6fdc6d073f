//! Memory Service Client
//!
//! HTTP adapter for the semantic memory collaborator. Embedding and
//! ranking internals live behind this contract.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use kizuna::{DomainError, MemoryHit, MemoryService};

/// HTTP implementation of MemoryService
pub struct HttpMemoryService {
    client: Client,
    base_url: String,
}

impl HttpMemoryService {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");

        Self { client, base_url }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    memories: Vec<MemoryHit>,
}

#[async_trait]
impl MemoryService for HttpMemoryService {
    async fn search(
        &self,
        user_id: Uuid,
        query: &str,
        limit: usize,
    ) -> Result<Vec<MemoryHit>, DomainError> {
        let response = self
            .client
            .post(format!("{}/memories/search", self.base_url))
            .json(&json!({
                "user_id": user_id,
                "query": query,
                "limit": limit,
            }))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Memory search failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Memory backend returned {}",
                status.as_u16()
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Invalid memory response: {e}")))?;

        Ok(parsed.memories)
    }

    async fn store(
        &self,
        user_id: Uuid,
        content: &str,
        category: &str,
    ) -> Result<(), DomainError> {
        let response = self
            .client
            .post(format!("{}/memories", self.base_url))
            .json(&json!({
                "user_id": user_id,
                "content": content,
                "category": category,
            }))
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(format!("Memory store failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalService(format!(
                "Memory backend returned {}",
                status.as_u16()
            )));
        }

        Ok(())
    }
}

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use backend_domain::{
    IdentityRecord,
    IdentityRole,
    IdentitySource,
    ScanWindow,
    SupportMessageRecord,
    SupportMessageSource,
    TransactionRecord,
    TransactionSource,
};

use crate::services::SourceProbe;
use crate::utils::{decode_records, extract_items};

/// Pulls records from the portal's document store REST API.
pub struct DocumentStoreSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl DocumentStoreSource {
    pub fn new(base_url: &str, token: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds.max(1)))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn fetch<R>(&self, collection: &str, query: Vec<(&'static str, String)>) -> Result<Vec<R>>
    where
        R: DeserializeOwned + Default,
    {
        let url = format!("{}/{}", self.base_url, collection);
        let mut request = self.client.get(&url).query(&query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("GET {} responded {}", url, status));
        }
        let payload: Value = response.json().await?;
        let records = decode_records(extract_items(payload)?, collection);
        debug!("fetched {} records from {}", records.len(), url);
        Ok(records)
    }
}

pub fn window_query(window: &ScanWindow) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(since) = window.since {
        query.push(("since", since.to_rfc3339()));
    }
    if let Some(until) = window.until {
        query.push(("until", until.to_rfc3339()));
    }
    query
}

#[async_trait]
impl TransactionSource for DocumentStoreSource {
    async fn list_transactions(&self, window: &ScanWindow) -> Result<Vec<TransactionRecord>> {
        self.fetch("transactions", window_query(window)).await
    }
}

#[async_trait]
impl SupportMessageSource for DocumentStoreSource {
    async fn list_support_messages(&self, window: &ScanWindow) -> Result<Vec<SupportMessageRecord>> {
        self.fetch("support-messages", window_query(window)).await
    }
}

#[async_trait]
impl IdentitySource for DocumentStoreSource {
    async fn list_identities(&self, role: Option<IdentityRole>) -> Result<Vec<IdentityRecord>> {
        let query = role
            .map(|role| vec![("role", role.as_str().to_string())])
            .unwrap_or_default();
        self.fetch("identities", query).await
    }
}

#[async_trait]
impl SourceProbe for DocumentStoreSource {
    async fn probe(&self) -> Result<()> {
        let mut request = self.client.get(&self.base_url);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        if response.status().is_server_error() {
            return Err(anyhow!("document store responded {}", response.status()));
        }
        Ok(())
    }
}

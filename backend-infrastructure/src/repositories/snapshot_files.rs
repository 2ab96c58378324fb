use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;

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
use crate::utils::{decode_records, extract_items, within_window};

/// Record sources backed by JSON exports of the portal's collections.
pub struct SnapshotFileSource {
    transactions_path: PathBuf,
    support_messages_path: PathBuf,
    identities_path: PathBuf,
}

impl SnapshotFileSource {
    pub fn new(
        transactions_path: impl Into<PathBuf>,
        support_messages_path: impl Into<PathBuf>,
        identities_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            transactions_path: transactions_path.into(),
            support_messages_path: support_messages_path.into(),
            identities_path: identities_path.into(),
        }
    }
}

async fn read_records<R>(path: &Path, kind: &str) -> Result<Vec<R>>
where
    R: DeserializeOwned + Default,
{
    let content = fs::read_to_string(path)
        .await
        .map_err(|err| anyhow!("cannot read {}: {}", path.display(), err))?;
    let payload: Value = serde_json::from_str(&content)
        .map_err(|err| anyhow!("invalid JSON in {}: {}", path.display(), err))?;
    Ok(decode_records(extract_items(payload)?, kind))
}

#[async_trait]
impl TransactionSource for SnapshotFileSource {
    async fn list_transactions(&self, window: &ScanWindow) -> Result<Vec<TransactionRecord>> {
        let mut records: Vec<TransactionRecord> =
            read_records(&self.transactions_path, "transaction").await?;
        records.retain(|record| within_window(window, record.created_at.as_ref()));
        Ok(records)
    }
}

#[async_trait]
impl SupportMessageSource for SnapshotFileSource {
    async fn list_support_messages(&self, window: &ScanWindow) -> Result<Vec<SupportMessageRecord>> {
        let mut records: Vec<SupportMessageRecord> =
            read_records(&self.support_messages_path, "support message").await?;
        records.retain(|record| within_window(window, record.created_at.as_ref()));
        Ok(records)
    }
}

#[async_trait]
impl IdentitySource for SnapshotFileSource {
    async fn list_identities(&self, role: Option<IdentityRole>) -> Result<Vec<IdentityRecord>> {
        let mut records: Vec<IdentityRecord> = read_records(&self.identities_path, "identity").await?;
        if let Some(role) = role {
            records.retain(|record| {
                record
                    .role
                    .as_deref()
                    .and_then(IdentityRole::parse)
                    .map(|parsed| parsed == role)
                    .unwrap_or(false)
            });
        }
        Ok(records)
    }
}

#[async_trait]
impl SourceProbe for SnapshotFileSource {
    async fn probe(&self) -> Result<()> {
        for path in [
            &self.transactions_path,
            &self.support_messages_path,
            &self.identities_path,
        ] {
            fs::metadata(path)
                .await
                .map_err(|err| anyhow!("{} unavailable: {}", path.display(), err))?;
        }
        Ok(())
    }
}

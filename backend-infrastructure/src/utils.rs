use std::path::Path;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::fs;
use tracing::warn;
use uuid::Uuid;

use backend_domain::{parse_timestamp, ScanWindow};

pub async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Writes through a sibling temp file and renames it over `path`, so a
/// crash mid-write never leaves a truncated file behind.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<()> {
    ensure_parent_dir(path).await?;
    let file_name = path
        .file_name()
        .ok_or_else(|| anyhow!("{} has no file name", path.display()))?
        .to_string_lossy()
        .to_string();
    let tmp = path.with_file_name(format!(".{}.{}.tmp", file_name, Uuid::new_v4().simple()));
    fs::write(&tmp, content).await?;
    if let Err(err) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(err.into());
    }
    Ok(())
}

/// Accepts a bare JSON array or an object wrapping one under `items`
/// or `data`.
pub fn extract_items(payload: Value) -> Result<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => {
            for key in ["items", "data"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return Ok(items);
                }
            }
            Err(anyhow!("expected a JSON array of records"))
        }
        _ => Err(anyhow!("expected a JSON array of records")),
    }
}

/// Decodes each element on its own. An element with the wrong shape
/// becomes an empty record, which normalization later rejects and counts.
pub fn decode_records<R>(items: Vec<Value>, kind: &str) -> Vec<R>
where
    R: DeserializeOwned + Default,
{
    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).unwrap_or_else(|err| {
                warn!("undecodable {} record: {}", kind, err);
                R::default()
            })
        })
        .collect()
}

/// Keeps records whose timestamp falls inside `window`. Records without
/// a readable timestamp are kept so normalization can count them.
pub fn within_window(window: &ScanWindow, created_at: Option<&Value>) -> bool {
    match created_at.and_then(parse_timestamp) {
        Some(at) => window.contains(at),
        None => true,
    }
}

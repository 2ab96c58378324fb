use std::env;
use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::RuntimeConfig;

use super::validation::{require_positive, validate_http_url};

pub const CONFIG_PATH_ENV: &str = "DOORGUARD_CONFIG";

/// Where scan input comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMode {
    File,
    Http,
}

impl SourceMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "file" => Some(SourceMode::File),
            "http" => Some(SourceMode::Http),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub source_mode: SourceMode,
    pub transactions_path: String,
    pub support_messages_path: String,
    pub identities_path: String,
    pub document_store_url: Option<String>,
    pub document_store_token: Option<String>,
    pub detection_rules_path: String,
    pub alerts_path: String,
    pub alert_webhook_url: Option<String>,
    pub scan_interval_minutes: u64,
    pub source_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: u64,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            api_token: None,
            source_mode: SourceMode::File,
            transactions_path: "./data/transactions.json".to_string(),
            support_messages_path: "./data/support_messages.json".to_string(),
            identities_path: "./data/identities.json".to_string(),
            document_store_url: None,
            document_store_token: None,
            detection_rules_path: runtime.detection_rules_path,
            alerts_path: "./data/alerts.json".to_string(),
            alert_webhook_url: None,
            scan_interval_minutes: runtime.scan_interval_minutes,
            source_timeout_seconds: runtime.source_timeout_seconds,
            request_timeout_seconds: runtime.request_timeout_seconds,
            max_body_bytes: runtime.max_body_bytes,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok()).await
    }

    /// Loads `file_path` (defaults when missing) and applies overrides
    /// looked up through `lookup_env`.
    pub async fn load_from(
        file_path: &Path,
        lookup_env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path).await?;
            toml::from_str::<AppConfig>(&content)
                .map_err(|err| anyhow!("invalid config {}: {}", file_path.display(), err))?
        } else {
            warn!("{} not found, using defaults", file_path.display());
            AppConfig::default()
        };
        config.apply_env_overrides(lookup_env)?;
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        for value in [
            &mut self.api_token,
            &mut self.document_store_url,
            &mut self.document_store_token,
            &mut self.alert_webhook_url,
            &mut self.log_dir,
        ] {
            if value.as_deref().map(|raw| raw.trim().is_empty()).unwrap_or(false) {
                *value = None;
            }
        }
        if let Some(url) = self.document_store_url.as_mut() {
            *url = url.trim().trim_end_matches('/').to_string();
        }
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.transactions_path = resolve_path(base, &self.transactions_path);
        self.support_messages_path = resolve_path(base, &self.support_messages_path);
        self.identities_path = resolve_path(base, &self.identities_path);
        self.detection_rules_path = resolve_path(base, &self.detection_rules_path);
        self.alerts_path = resolve_path(base, &self.alerts_path);
        if let Some(log_dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, log_dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        require_positive("source_timeout_seconds", self.source_timeout_seconds)?;
        require_positive("request_timeout_seconds", self.request_timeout_seconds)?;
        require_positive("max_body_bytes", self.max_body_bytes)?;
        match self.source_mode {
            SourceMode::File => {
                for (name, value) in [
                    ("transactions_path", &self.transactions_path),
                    ("support_messages_path", &self.support_messages_path),
                    ("identities_path", &self.identities_path),
                ] {
                    if value.trim().is_empty() {
                        return Err(anyhow!("{} must not be empty in file mode", name));
                    }
                }
            }
            SourceMode::Http => {
                let url = self
                    .document_store_url
                    .as_deref()
                    .ok_or_else(|| anyhow!("document_store_url is required in http mode"))?;
                validate_http_url("document_store_url", url)?;
            }
        }
        if let Some(url) = &self.alert_webhook_url {
            validate_http_url("alert_webhook_url", url)?;
        }
        if self.alerts_path.trim().is_empty() {
            return Err(anyhow!("alerts_path must not be empty"));
        }
        if self.detection_rules_path.trim().is_empty() {
            return Err(anyhow!("detection_rules_path must not be empty"));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            api_token: self.api_token.clone(),
            detection_rules_path: self.detection_rules_path.clone(),
            alert_webhook_url: self.alert_webhook_url.clone(),
            scan_interval_minutes: self.scan_interval_minutes,
            source_timeout_seconds: self.source_timeout_seconds,
            request_timeout_seconds: self.request_timeout_seconds,
            max_body_bytes: self.max_body_bytes,
        }
    }

    fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let var = |name: &str| lookup(&format!("DOORGUARD_{}", name));
        if let Some(value) = var("BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = var("API_TOKEN") {
            self.api_token = Some(value);
        }
        if let Some(value) = var("SOURCE_MODE") {
            self.source_mode = SourceMode::parse(&value)
                .ok_or_else(|| anyhow!("unknown DOORGUARD_SOURCE_MODE '{}'", value))?;
        }
        if let Some(value) = var("TRANSACTIONS_PATH") {
            self.transactions_path = value;
        }
        if let Some(value) = var("SUPPORT_MESSAGES_PATH") {
            self.support_messages_path = value;
        }
        if let Some(value) = var("IDENTITIES_PATH") {
            self.identities_path = value;
        }
        if let Some(value) = var("DOCUMENT_STORE_URL") {
            self.document_store_url = Some(value);
        }
        if let Some(value) = var("DOCUMENT_STORE_TOKEN") {
            self.document_store_token = Some(value);
        }
        if let Some(value) = var("DETECTION_RULES_PATH") {
            self.detection_rules_path = value;
        }
        if let Some(value) = var("ALERTS_PATH") {
            self.alerts_path = value;
        }
        if let Some(value) = var("ALERT_WEBHOOK_URL") {
            self.alert_webhook_url = Some(value);
        }
        if let Some(value) = var("SCAN_INTERVAL_MINUTES") {
            self.scan_interval_minutes = value.parse().unwrap_or(self.scan_interval_minutes);
        }
        if let Some(value) = var("SOURCE_TIMEOUT_SECONDS") {
            self.source_timeout_seconds = value.parse().unwrap_or(self.source_timeout_seconds);
        }
        if let Some(value) = var("REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = var("MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = var("LOG_DIR") {
            self.log_dir = Some(value);
        }
        Ok(())
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

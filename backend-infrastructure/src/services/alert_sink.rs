use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use backend_domain::ports::AlertSink;
use backend_domain::{Alert, RuntimeConfig};

const MAX_LISTED: usize = 8;

/// Posts newly created alerts to `alert_webhook_url`.
#[derive(Default)]
pub struct WebhookAlertSink;

impl WebhookAlertSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    fn spawn_alerts(&self, config: RuntimeConfig, alerts: Vec<Alert>) {
        if alerts.is_empty() {
            return;
        }
        let Some(url) = resolve_alert_url(&config) else {
            debug!("alert webhook not configured, {} new alerts kept local", alerts.len());
            return;
        };
        tokio::spawn(async move {
            if let Err(err) = send_alerts(&config, &url, &alerts).await {
                warn!("alert webhook failed: {}", err);
            }
        });
    }

    async fn deliver_alerts(&self, config: &RuntimeConfig, alerts: &[Alert]) -> Result<()> {
        if alerts.is_empty() {
            return Ok(());
        }
        let Some(url) = resolve_alert_url(config) else {
            debug!("alert webhook not configured, {} new alerts kept local", alerts.len());
            return Ok(());
        };
        send_alerts(config, &url, alerts).await
    }

    async fn check_alert_target(&self, config: &RuntimeConfig) -> Result<()> {
        let url = resolve_alert_url(config)
            .ok_or_else(|| anyhow::anyhow!("alert webhook url not configured"))?;
        let response = client(config)?.get(&url).send().await?;
        if response.status().is_server_error() {
            anyhow::bail!("alert webhook responded {}", response.status());
        }
        Ok(())
    }
}

fn client(config: &RuntimeConfig) -> Result<Client> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.request_timeout_seconds.max(3)))
        .build()?)
}

async fn send_alerts(config: &RuntimeConfig, url: &str, alerts: &[Alert]) -> Result<()> {
    client(config)?
        .post(url)
        .json(&build_payload(alerts))
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

fn resolve_alert_url(config: &RuntimeConfig) -> Option<String> {
    config
        .alert_webhook_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(ToString::to_string)
}

pub fn build_message(alerts: &[Alert]) -> String {
    let mut lines = vec![format!("{} new risk alerts", alerts.len())];
    for alert in alerts.iter().take(MAX_LISTED) {
        lines.push(format!(
            "{} | {} | {} | {}",
            alert.subject_name,
            alert.category,
            alert.risk_level.as_str(),
            alert.reason
        ));
    }
    if alerts.len() > MAX_LISTED {
        lines.push(format!("...and {} more", alerts.len() - MAX_LISTED));
    }
    lines.join("\n")
}

pub fn build_payload(alerts: &[Alert]) -> Value {
    json!({
        "message": build_message(alerts),
        "total": alerts.len(),
        "alerts": alerts,
    })
}

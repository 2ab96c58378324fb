// Runtime settings shared with the application layer

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub api_token: Option<String>,
    pub detection_rules_path: String,
    pub alert_webhook_url: Option<String>,
    pub scan_interval_minutes: u64,
    pub source_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3240".to_string(),
            api_token: None,
            detection_rules_path: "./detection_rules.yaml".to_string(),
            alert_webhook_url: None,
            scan_interval_minutes: 0,
            source_timeout_seconds: 10,
            request_timeout_seconds: 15,
            max_body_bytes: 1024 * 1024,
        }
    }
}

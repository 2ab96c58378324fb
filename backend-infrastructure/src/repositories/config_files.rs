use std::path::Path;

use async_trait::async_trait;
use tokio::fs;
use tracing::warn;

use backend_domain::{ConfigRepository, DetectionConfig};

use crate::utils::write_atomic;

/// Detection rules kept as YAML next to the service config.
pub struct DetectionConfigFileRepository;

impl DetectionConfigFileRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DetectionConfigFileRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigRepository for DetectionConfigFileRepository {
    async fn load_detection_config(&self, path: &str) -> anyhow::Result<DetectionConfig> {
        if !Path::new(path).exists() {
            warn!("{} not found, using default detection rules", path);
            return Ok(DetectionConfig::default());
        }
        let content = fs::read_to_string(path).await?;
        if content.trim().is_empty() {
            return Ok(DetectionConfig::default());
        }
        let config: DetectionConfig = serde_yaml::from_str(&content)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    async fn save_detection_config(&self, path: &str, config: &DetectionConfig) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(config)?;
        write_atomic(Path::new(path), content.as_bytes()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        let repo = DetectionConfigFileRepository::new();
        let config = repo
            .load_detection_config(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(config, DetectionConfig::default());
    }

    #[tokio::test]
    async fn partial_yaml_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(
            &path,
            "large_amount_threshold: 15000\nflagged_keywords:\n  - Hawala\n  - hawala\n",
        )
        .unwrap();
        let repo = DetectionConfigFileRepository::new();
        let config = repo
            .load_detection_config(path.to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(config.large_amount_threshold, 15000.0);
        assert_eq!(config.flagged_keywords, vec!["hawala".to_string()]);
        assert_eq!(config.suspicious_repeat_min, 2);
    }

    #[tokio::test]
    async fn saved_rules_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conf/rules.yaml");
        let path = path.to_str().unwrap();
        let repo = DetectionConfigFileRepository::new();
        let config = DetectionConfig {
            agent_min_handled: 25,
            ..DetectionConfig::default()
        };
        repo.save_detection_config(path, &config).await.unwrap();
        assert_eq!(repo.load_detection_config(path).await.unwrap(), config);
    }

    #[tokio::test]
    async fn invalid_rules_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.yaml");
        std::fs::write(&path, "agent_approval_rate: 3.0\n").unwrap();
        let repo = DetectionConfigFileRepository::new();
        assert!(repo
            .load_detection_config(path.to_str().unwrap())
            .await
            .is_err());
    }
}

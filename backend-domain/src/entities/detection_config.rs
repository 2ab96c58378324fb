// Detection thresholds
// Loaded from YAML so rules can be tuned without a redeploy

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Round "test" amounts that are suspicious when repeated.
    pub suspicious_amounts: Vec<f64>,
    pub suspicious_repeat_min: u64,
    /// Amounts strictly above this are large-value.
    pub large_amount_threshold: f64,
    pub large_repeat_min: u64,
    /// Agents must have handled strictly more than this.
    pub agent_min_handled: u64,
    /// Approval ratio strictly above this is abnormal.
    pub agent_approval_rate: f64,
    pub recent_evidence_limit: usize,
    pub flagged_keywords: Vec<String>,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            suspicious_amounts: vec![999.0, 1999.0, 4999.0, 9999.0],
            suspicious_repeat_min: 2,
            large_amount_threshold: 8000.0,
            large_repeat_min: 3,
            agent_min_handled: 10,
            agent_approval_rate: 0.95,
            recent_evidence_limit: 5,
            flagged_keywords: [
                "money laundering",
                "launder",
                "bypass verification",
                "skip verification",
                "without kyc",
                "fake document",
                "fake id",
                "black money",
                "untraceable",
                "hack",
            ]
            .iter()
            .map(|word| word.to_string())
            .collect(),
        }
    }
}

impl DetectionConfig {
    /// Lower-cases and de-duplicates keywords, sorts amounts.
    pub fn normalized(mut self) -> Self {
        let mut keywords: Vec<String> = Vec::with_capacity(self.flagged_keywords.len());
        for keyword in self.flagged_keywords.drain(..) {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }
        self.flagged_keywords = keywords;
        self.suspicious_amounts
            .sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        self.suspicious_amounts.dedup();
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self
            .suspicious_amounts
            .iter()
            .any(|amount| !amount.is_finite() || *amount < 0.0)
        {
            return Err(DomainError::InvalidConfig(
                "suspicious_amounts must be finite and non-negative".to_string(),
            ));
        }
        if self.suspicious_repeat_min == 0 || self.large_repeat_min == 0 {
            return Err(DomainError::InvalidConfig(
                "repeat minimums must be greater than 0".to_string(),
            ));
        }
        if !self.large_amount_threshold.is_finite() || self.large_amount_threshold <= 0.0 {
            return Err(DomainError::InvalidConfig(
                "large_amount_threshold must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.agent_approval_rate) {
            return Err(DomainError::InvalidConfig(
                "agent_approval_rate must be within 0..=1".to_string(),
            ));
        }
        if self.recent_evidence_limit == 0 {
            return Err(DomainError::InvalidConfig(
                "recent_evidence_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_suspicious_amount(&self, amount: f64) -> bool {
        self.suspicious_amounts.iter().any(|value| *value == amount)
    }

    pub fn is_large_amount(&self, amount: f64) -> bool {
        amount > self.large_amount_threshold
    }
}

// Alert category value object

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    SuspiciousActivity,
    UnusualPatterns,
    ContentViolation,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 3] = [
        AlertCategory::SuspiciousActivity,
        AlertCategory::UnusualPatterns,
        AlertCategory::ContentViolation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::SuspiciousActivity => "suspicious_activity",
            AlertCategory::UnusualPatterns => "unusual_patterns",
            AlertCategory::ContentViolation => "content_violation",
        }
    }

    /// Parses the wire name. Unlike other enums in this crate there is no
    /// fallback variant: an unknown category is a caller error.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "suspicious_activity" => Some(AlertCategory::SuspiciousActivity),
            "unusual_patterns" => Some(AlertCategory::UnusualPatterns),
            "content_violation" => Some(AlertCategory::ContentViolation),
            _ => None,
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

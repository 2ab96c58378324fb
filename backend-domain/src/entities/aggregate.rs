// Per-subject running statistics, rebuilt on every scan

use super::TransactionRef;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgentStats {
    pub handled: u64,
    pub approved: u64,
    pub rejected: u64,
    pub amount_sum: f64,
    pub handled_refs: Vec<TransactionRef>,
}

impl AgentStats {
    pub fn approval_rate(&self) -> f64 {
        if self.handled == 0 {
            0.0
        } else {
            self.approved as f64 / self.handled as f64
        }
    }

    pub fn average_amount(&self) -> f64 {
        if self.handled == 0 {
            0.0
        } else {
            self.amount_sum / self.handled as f64
        }
    }

    /// Newest first, at most `limit` entries.
    pub fn recent(&self, limit: usize) -> Vec<TransactionRef> {
        let mut refs = self.handled_refs.clone();
        refs.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));
        refs.truncate(limit);
        refs
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectAggregate {
    pub subject_id: String,
    pub transaction_count: u64,
    pub suspicious_count: u64,
    pub large_count: u64,
    pub suspicious_refs: Vec<TransactionRef>,
    pub large_refs: Vec<TransactionRef>,
    /// Present only when the subject handled at least one transaction as
    /// an agent.
    pub agent: Option<AgentStats>,
}

impl SubjectAggregate {
    pub fn new(subject_id: impl Into<String>) -> Self {
        Self {
            subject_id: subject_id.into(),
            ..Self::default()
        }
    }
}

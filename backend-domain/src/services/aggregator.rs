use std::cmp::Ordering;
use std::collections::HashMap;

use crate::entities::{AgentStats, DetectionConfig, SubjectAggregate, Transaction, TransactionRef};
use crate::value_objects::TransactionStatus;

/// Folds one scan's transactions into per-subject statistics.
#[derive(Debug)]
pub struct Aggregator<'a> {
    config: &'a DetectionConfig,
}

impl<'a> Aggregator<'a> {
    pub fn new(config: &'a DetectionConfig) -> Self {
        Self { config }
    }

    pub fn fold(&self, transactions: &[Transaction]) -> HashMap<String, SubjectAggregate> {
        let mut aggregates: HashMap<String, SubjectAggregate> = HashMap::new();
        for tx in transactions {
            let user = aggregates
                .entry(tx.user_id.clone())
                .or_insert_with(|| SubjectAggregate::new(tx.user_id.clone()));
            user.transaction_count += 1;
            if self.config.is_suspicious_amount(tx.amount) {
                user.suspicious_count += 1;
                user.suspicious_refs.push(TransactionRef::from(tx));
            }
            if self.config.is_large_amount(tx.amount) {
                user.large_count += 1;
                user.large_refs.push(TransactionRef::from(tx));
            }

            let Some(agent_id) = tx.agent_id.as_deref() else {
                continue;
            };
            let agent = aggregates
                .entry(agent_id.to_string())
                .or_insert_with(|| SubjectAggregate::new(agent_id));
            let stats = agent.agent.get_or_insert_with(AgentStats::default);
            stats.handled += 1;
            if tx.status.counts_as_approved() {
                stats.approved += 1;
            } else if tx.status == TransactionStatus::Rejected {
                stats.rejected += 1;
            }
            stats.amount_sum += tx.amount;
            stats.handled_refs.push(TransactionRef::from(tx));
        }
        // Evidence order must not depend on the order the source returned.
        for aggregate in aggregates.values_mut() {
            aggregate.suspicious_refs.sort_by(by_date_then_id);
            aggregate.large_refs.sort_by(by_date_then_id);
        }
        aggregates
    }
}

fn by_date_then_id(a: &TransactionRef, b: &TransactionRef) -> Ordering {
    a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id))
}

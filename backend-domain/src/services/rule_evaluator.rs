use std::collections::HashMap;

use crate::entities::{
    CandidateAlert,
    DetectionConfig,
    Evidence,
    FlaggedMessage,
    IdentityDirectory,
    SubjectAggregate,
    SupportMessage,
    Transaction,
    TransactionRef,
};
use crate::services::Aggregator;
use crate::utils::format_rate;
use crate::value_objects::{AlertCategory, AlertKey, SubjectRole, ANONYMOUS_SUBJECT};

pub const SUSPICIOUS_AMOUNT_CONFIDENCE: f64 = 0.85;
pub const LARGE_TRANSACTION_CONFIDENCE: f64 = 0.78;
pub const FLAGGED_CONTENT_CONFIDENCE: f64 = 0.92;
pub const AGENT_APPROVAL_CONFIDENCE: f64 = 0.88;

const ANONYMOUS_NAME: &str = "Anonymous";

#[derive(Debug, Clone)]
pub struct RuleEvaluator {
    config: DetectionConfig,
}

impl RuleEvaluator {
    pub fn new(config: DetectionConfig) -> Self {
        Self {
            config: config.normalized(),
        }
    }

    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Aggregates `transactions` and runs every rule over the result.
    pub fn evaluate_scan(
        &self,
        transactions: &[Transaction],
        messages: &[SupportMessage],
        identities: &IdentityDirectory,
    ) -> Vec<CandidateAlert> {
        let aggregates = Aggregator::new(&self.config).fold(transactions);
        self.evaluate(&aggregates, messages, identities)
    }

    /// Rules run in a fixed order and the output is sorted by subject id
    /// within each rule, so identical input yields an identical list.
    /// Firings that share a subject and category are folded into one
    /// candidate; when their evidence kinds differ the earlier rule wins.
    pub fn evaluate(
        &self,
        aggregates: &HashMap<String, SubjectAggregate>,
        messages: &[SupportMessage],
        identities: &IdentityDirectory,
    ) -> Vec<CandidateAlert> {
        let mut subjects: Vec<&SubjectAggregate> = aggregates.values().collect();
        subjects.sort_by(|a, b| a.subject_id.cmp(&b.subject_id));

        let mut batch = CandidateBatch::default();
        for aggregate in &subjects {
            if let Some(candidate) = self.repeated_suspicious_amounts(aggregate, identities) {
                batch.push(candidate);
            }
        }
        for aggregate in &subjects {
            if let Some(candidate) = self.repeated_large_transactions(aggregate, identities) {
                batch.push(candidate);
            }
        }
        let mut ordered_messages: Vec<&SupportMessage> = messages.iter().collect();
        ordered_messages.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        for message in ordered_messages {
            if let Some(candidate) = self.flagged_support_content(message, identities) {
                batch.push(candidate);
            }
        }
        for aggregate in &subjects {
            if let Some(candidate) = self.abnormal_agent_approval(aggregate, identities) {
                batch.push(candidate);
            }
        }
        batch.into_candidates()
    }

    fn repeated_suspicious_amounts(
        &self,
        aggregate: &SubjectAggregate,
        identities: &IdentityDirectory,
    ) -> Option<CandidateAlert> {
        if aggregate.suspicious_count < self.config.suspicious_repeat_min {
            return None;
        }
        let evidence = Evidence::SuspiciousAmounts {
            transactions: aggregate.suspicious_refs.clone(),
        };
        if evidence.is_empty() {
            return None;
        }
        Some(CandidateAlert {
            subject_id: aggregate.subject_id.clone(),
            subject_name: subject_name(&aggregate.subject_id, identities),
            subject_role: SubjectRole::User,
            category: AlertCategory::SuspiciousActivity,
            reason: format!(
                "{} transactions with suspicious test amounts ({})",
                aggregate.suspicious_count,
                join_amounts(&aggregate.suspicious_refs)
            ),
            confidence: SUSPICIOUS_AMOUNT_CONFIDENCE,
            evidence,
        })
    }

    fn repeated_large_transactions(
        &self,
        aggregate: &SubjectAggregate,
        identities: &IdentityDirectory,
    ) -> Option<CandidateAlert> {
        if aggregate.large_count < self.config.large_repeat_min {
            return None;
        }
        let evidence = Evidence::LargeTransactions {
            threshold: self.config.large_amount_threshold,
            transactions: aggregate.large_refs.clone(),
        };
        if evidence.is_empty() {
            return None;
        }
        Some(CandidateAlert {
            subject_id: aggregate.subject_id.clone(),
            subject_name: subject_name(&aggregate.subject_id, identities),
            subject_role: SubjectRole::User,
            category: AlertCategory::UnusualPatterns,
            reason: format!(
                "{} transactions above {} in the scan window",
                aggregate.large_count, self.config.large_amount_threshold
            ),
            confidence: LARGE_TRANSACTION_CONFIDENCE,
            evidence,
        })
    }

    fn flagged_support_content(
        &self,
        message: &SupportMessage,
        identities: &IdentityDirectory,
    ) -> Option<CandidateAlert> {
        let flagged_words = self.flagged_words(&message.body);
        if flagged_words.is_empty() {
            return None;
        }
        let (subject_id, name) = match message.user_id.as_deref() {
            Some(user_id) => (user_id.to_string(), subject_name(user_id, identities)),
            None => (ANONYMOUS_SUBJECT.to_string(), ANONYMOUS_NAME.to_string()),
        };
        let evidence = Evidence::FlaggedContent {
            flagged_words: flagged_words.clone(),
            messages: vec![FlaggedMessage {
                message_id: message.id.clone(),
                message: message.body.clone(),
                email: message.email.clone(),
                phone: message.phone.clone(),
                flagged_words,
            }],
        };
        Some(CandidateAlert {
            subject_id,
            subject_name: name,
            subject_role: SubjectRole::User,
            category: AlertCategory::ContentViolation,
            reason: flagged_content_reason(&evidence),
            confidence: FLAGGED_CONTENT_CONFIDENCE,
            evidence,
        })
    }

    fn abnormal_agent_approval(
        &self,
        aggregate: &SubjectAggregate,
        identities: &IdentityDirectory,
    ) -> Option<CandidateAlert> {
        let stats = aggregate.agent.as_ref()?;
        if stats.handled <= self.config.agent_min_handled {
            return None;
        }
        let rate = stats.approval_rate();
        if rate <= self.config.agent_approval_rate {
            return None;
        }
        let approval_rate = format_rate(rate);
        let evidence = Evidence::AgentApproval {
            approval_rate: approval_rate.clone(),
            handled: stats.handled,
            approved: stats.approved,
            rejected: stats.rejected,
            average_amount: stats.average_amount(),
            recent_transactions: stats.recent(self.config.recent_evidence_limit),
        };
        if evidence.is_empty() {
            return None;
        }
        Some(CandidateAlert {
            subject_id: aggregate.subject_id.clone(),
            subject_name: subject_name(&aggregate.subject_id, identities),
            subject_role: SubjectRole::Agent,
            category: AlertCategory::UnusualPatterns,
            reason: format!(
                "Agent approved {} of {} handled requests",
                approval_rate, stats.handled
            ),
            confidence: AGENT_APPROVAL_CONFIDENCE,
            evidence,
        })
    }

    /// Literal substring match after case-folding, in configured order.
    pub fn flagged_words(&self, body: &str) -> Vec<String> {
        let lowered = body.to_lowercase();
        self.config
            .flagged_keywords
            .iter()
            .filter(|keyword| lowered.contains(keyword.as_str()))
            .cloned()
            .collect()
    }
}

#[derive(Default)]
struct CandidateBatch {
    candidates: Vec<CandidateAlert>,
    index: HashMap<AlertKey, usize>,
}

impl CandidateBatch {
    fn push(&mut self, candidate: CandidateAlert) {
        let key = candidate.key();
        match self.index.get(&key) {
            Some(&position) => {
                let existing = &mut self.candidates[position];
                if existing.evidence.absorb(candidate.evidence)
                    && matches!(existing.evidence, Evidence::FlaggedContent { .. })
                {
                    existing.reason = flagged_content_reason(&existing.evidence);
                }
            }
            None => {
                self.index.insert(key, self.candidates.len());
                self.candidates.push(candidate);
            }
        }
    }

    fn into_candidates(self) -> Vec<CandidateAlert> {
        self.candidates
    }
}

fn subject_name(subject_id: &str, identities: &IdentityDirectory) -> String {
    identities
        .display_name(subject_id)
        .unwrap_or(subject_id)
        .to_string()
}

fn join_amounts(refs: &[TransactionRef]) -> String {
    refs.iter()
        .map(|tx| tx.amount.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn flagged_content_reason(evidence: &Evidence) -> String {
    match evidence {
        Evidence::FlaggedContent {
            flagged_words,
            messages,
        } if messages.len() > 1 => format!(
            "{} support messages contain flagged terms: {}",
            messages.len(),
            flagged_words.join(", ")
        ),
        Evidence::FlaggedContent { flagged_words, .. } => {
            format!("Support message contains flagged terms: {}", flagged_words.join(", "))
        }
        other => format!("Flagged {}", other.kind()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Identity;
    use crate::value_objects::{IdentityRole, ServiceCategory, TransactionStatus};
    use chrono::{Duration, TimeZone, Utc};

    fn tx(id: &str, user: &str, agent: Option<&str>, amount: f64, status: TransactionStatus, minute: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            user_id: user.to_string(),
            agent_id: agent.map(ToString::to_string),
            amount,
            service_category: ServiceCategory::CashWithdrawal,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap() + Duration::minutes(minute),
        }
    }

    fn message(id: &str, user: Option<&str>, body: &str) -> SupportMessage {
        SupportMessage {
            id: id.to_string(),
            user_id: user.map(ToString::to_string),
            body: body.to_string(),
            email: Some("someone@example.com".to_string()),
            phone: Some("+91-9000000000".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap(),
        }
    }

    fn directory() -> IdentityDirectory {
        IdentityDirectory::new(vec![
            Identity {
                id: "U".to_string(),
                name: "Uma Customer".to_string(),
                role: IdentityRole::Customer,
                profile: Default::default(),
            },
            Identity {
                id: "A".to_string(),
                name: "Arun Agent".to_string(),
                role: IdentityRole::Agent,
                profile: Default::default(),
            },
        ])
    }

    fn evaluator() -> RuleEvaluator {
        RuleEvaluator::new(DetectionConfig::default())
    }

    #[test]
    fn repeated_suspicious_amounts_fire_once_with_matching_evidence() {
        let txs = vec![
            tx("t1", "U", None, 999.0, TransactionStatus::Requested, 0),
            tx("t2", "U", None, 1999.0, TransactionStatus::Requested, 1),
            tx("t3", "U", None, 500.0, TransactionStatus::Requested, 2),
        ];
        let candidates = evaluator().evaluate_scan(&txs, &[], &directory());
        assert_eq!(candidates.len(), 1);
        let alert = &candidates[0];
        assert_eq!(alert.category, AlertCategory::SuspiciousActivity);
        assert_eq!(alert.subject_id, "U");
        assert_eq!(alert.subject_name, "Uma Customer");
        assert_eq!(alert.confidence, 0.85);
        match &alert.evidence {
            Evidence::SuspiciousAmounts { transactions } => {
                let ids: Vec<&str> = transactions.iter().map(|t| t.id.as_str()).collect();
                assert_eq!(ids, vec!["t1", "t2"]);
            }
            other => panic!("unexpected evidence {:?}", other),
        }
    }

    #[test]
    fn single_suspicious_amount_does_not_fire() {
        let txs = vec![tx("t1", "U", None, 999.0, TransactionStatus::Requested, 0)];
        assert!(evaluator().evaluate_scan(&txs, &[], &directory()).is_empty());
    }

    #[test]
    fn large_transactions_need_three_occurrences() {
        let two = vec![
            tx("t1", "U", None, 9000.0, TransactionStatus::Approved, 0),
            tx("t2", "U", None, 12000.0, TransactionStatus::Approved, 1),
        ];
        assert!(evaluator().evaluate_scan(&two, &[], &directory()).is_empty());

        let mut three = two.clone();
        three.push(tx("t3", "U", None, 8500.0, TransactionStatus::Approved, 2));
        let candidates = evaluator().evaluate_scan(&three, &[], &directory());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].category, AlertCategory::UnusualPatterns);
        assert_eq!(candidates[0].subject_role, SubjectRole::User);
        assert_eq!(candidates[0].confidence, 0.78);
    }

    #[test]
    fn flagged_keyword_produces_content_violation() {
        let messages = vec![
            message("m1", Some("U"), "Can your agent BYPASS VERIFICATION for my cousin?"),
            message("m2", Some("U"), "Please reschedule my pickup."),
        ];
        let candidates = evaluator().evaluate_scan(&[], &messages, &directory());
        assert_eq!(candidates.len(), 1);
        let alert = &candidates[0];
        assert_eq!(alert.category, AlertCategory::ContentViolation);
        assert_eq!(alert.confidence, 0.92);
        match &alert.evidence {
            Evidence::FlaggedContent {
                flagged_words,
                messages,
            } => {
                assert!(flagged_words.contains(&"bypass verification".to_string()));
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].message_id, "m1");
                assert_eq!(messages[0].email.as_deref(), Some("someone@example.com"));
            }
            other => panic!("unexpected evidence {:?}", other),
        }
    }

    #[test]
    fn clean_message_produces_nothing() {
        let messages = vec![message("m1", None, "My deposit receipt never arrived")];
        assert!(evaluator().evaluate_scan(&[], &messages, &directory()).is_empty());
    }

    #[test]
    fn substring_matches_are_literal() {
        let words = evaluator().flagged_words("I think a hacker got into my account");
        assert_eq!(words, vec!["hack".to_string()]);
    }

    #[test]
    fn anonymous_messages_fold_into_one_candidate() {
        let messages = vec![
            message("m1", None, "how to launder cash through deposits"),
            message("m2", None, "need a fake id for account opening"),
        ];
        let candidates = evaluator().evaluate_scan(&[], &messages, &directory());
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].subject_id, ANONYMOUS_SUBJECT);
        assert_eq!(candidates[0].subject_name, "Anonymous");
        assert!(candidates[0].reason.starts_with("2 support messages"));
        match &candidates[0].evidence {
            Evidence::FlaggedContent {
                flagged_words,
                messages,
            } => {
                assert_eq!(messages.len(), 2);
                assert!(flagged_words.contains(&"launder".to_string()));
                assert!(flagged_words.contains(&"fake id".to_string()));
            }
            other => panic!("unexpected evidence {:?}", other),
        }
    }

    #[test]
    fn agent_with_full_approval_over_threshold_is_flagged() {
        let txs = (0..12)
            .map(|i| {
                tx(
                    &format!("t{:02}", i),
                    &format!("c{}", i),
                    Some("A"),
                    100.0 * (i + 1) as f64,
                    TransactionStatus::Approved,
                    i,
                )
            })
            .collect::<Vec<_>>();
        let candidates = evaluator().evaluate_scan(&txs, &[], &directory());
        assert_eq!(candidates.len(), 1);
        let alert = &candidates[0];
        assert_eq!(alert.subject_id, "A");
        assert_eq!(alert.subject_role, SubjectRole::Agent);
        assert_eq!(alert.category, AlertCategory::UnusualPatterns);
        assert_eq!(alert.confidence, 0.88);
        match &alert.evidence {
            Evidence::AgentApproval {
                approval_rate,
                handled,
                approved,
                rejected,
                average_amount,
                recent_transactions,
            } => {
                assert_eq!(approval_rate, "100.0%");
                assert_eq!((*handled, *approved, *rejected), (12, 12, 0));
                assert_eq!(*average_amount, 650.0);
                assert_eq!(recent_transactions.len(), 5);
                assert_eq!(recent_transactions[0].id, "t11");
            }
            other => panic!("unexpected evidence {:?}", other),
        }
    }

    #[test]
    fn agent_below_handled_threshold_is_not_flagged() {
        let txs = (0..8)
            .map(|i| tx(&format!("t{}", i), "U", Some("A"), 100.0, TransactionStatus::Approved, i))
            .collect::<Vec<_>>();
        assert!(evaluator().evaluate_scan(&txs, &[], &directory()).is_empty());
    }

    #[test]
    fn agent_at_rate_threshold_is_not_flagged() {
        // 19 of 20 is exactly 95%, which is not above the cutoff.
        let txs = (0..20)
            .map(|i| {
                let status = if i == 0 {
                    TransactionStatus::Rejected
                } else {
                    TransactionStatus::Completed
                };
                tx(&format!("t{}", i), "U", Some("A"), 100.0, status, i)
            })
            .collect::<Vec<_>>();
        assert!(evaluator().evaluate_scan(&txs, &[], &directory()).is_empty());
    }

    #[test]
    fn unknown_subject_falls_back_to_id() {
        let txs = vec![
            tx("t1", "ghost", None, 4999.0, TransactionStatus::Requested, 0),
            tx("t2", "ghost", None, 9999.0, TransactionStatus::Requested, 1),
        ];
        let candidates = evaluator().evaluate_scan(&txs, &[], &IdentityDirectory::default());
        assert_eq!(candidates[0].subject_name, "ghost");
    }

    #[test]
    fn rescanning_reordered_records_is_not_an_update() {
        let mut txs = vec![
            tx("t1", "U", None, 999.0, TransactionStatus::Requested, 0),
            tx("t2", "U", None, 9000.0, TransactionStatus::Requested, 1),
            tx("t3", "U", None, 1999.0, TransactionStatus::Requested, 2),
            tx("t4", "U", None, 9100.0, TransactionStatus::Requested, 3),
            tx("t5", "U", None, 9200.0, TransactionStatus::Requested, 4),
        ];
        let now = Utc.with_ymd_and_hms(2024, 5, 3, 9, 0, 0).unwrap();
        let mut store = crate::services::AlertStore::new();
        let first = store.merge(evaluator().evaluate_scan(&txs, &[], &directory()), now);
        assert_eq!(first.created.len(), 2);

        txs.reverse();
        let second = store.merge(
            evaluator().evaluate_scan(&txs, &[], &directory()),
            now + Duration::hours(1),
        );
        assert!(second.created.is_empty());
        assert_eq!(second.updated, 0);
    }
}

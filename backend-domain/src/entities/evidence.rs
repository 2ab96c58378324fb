// Evidence payloads attached to alerts

use serde::{Deserialize, Serialize};

use super::TransactionRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedMessage {
    pub message_id: String,
    pub message: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub flagged_words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Evidence {
    SuspiciousAmounts {
        transactions: Vec<TransactionRef>,
    },
    #[serde(rename_all = "camelCase")]
    LargeTransactions {
        threshold: f64,
        transactions: Vec<TransactionRef>,
    },
    #[serde(rename_all = "camelCase")]
    FlaggedContent {
        flagged_words: Vec<String>,
        messages: Vec<FlaggedMessage>,
    },
    #[serde(rename_all = "camelCase")]
    AgentApproval {
        approval_rate: String,
        handled: u64,
        approved: u64,
        rejected: u64,
        average_amount: f64,
        recent_transactions: Vec<TransactionRef>,
    },
}

impl Evidence {
    pub fn kind(&self) -> &'static str {
        match self {
            Evidence::SuspiciousAmounts { .. } => "suspiciousAmounts",
            Evidence::LargeTransactions { .. } => "largeTransactions",
            Evidence::FlaggedContent { .. } => "flaggedContent",
            Evidence::AgentApproval { .. } => "agentApproval",
        }
    }

    /// Alerts never carry empty evidence; rules check this before firing.
    pub fn is_empty(&self) -> bool {
        match self {
            Evidence::SuspiciousAmounts { transactions }
            | Evidence::LargeTransactions { transactions, .. } => transactions.is_empty(),
            Evidence::FlaggedContent {
                flagged_words,
                messages,
            } => flagged_words.is_empty() || messages.is_empty(),
            Evidence::AgentApproval {
                handled,
                recent_transactions,
                ..
            } => *handled == 0 || recent_transactions.is_empty(),
        }
    }

    /// Folds a second firing for the same subject and category into this
    /// payload. Only flagged content accumulates; returns `false` when the
    /// two payloads are of different kinds and nothing was merged.
    pub fn absorb(&mut self, other: Evidence) -> bool {
        match (self, other) {
            (
                Evidence::FlaggedContent {
                    flagged_words,
                    messages,
                },
                Evidence::FlaggedContent {
                    flagged_words: other_words,
                    messages: other_messages,
                },
            ) => {
                for word in other_words {
                    if !flagged_words.contains(&word) {
                        flagged_words.push(word);
                    }
                }
                for message in other_messages {
                    if !messages.iter().any(|m| m.message_id == message.message_id) {
                        messages.push(message);
                    }
                }
                true
            }
            (current, other) if current.kind() == other.kind() => {
                *current = other;
                true
            }
            _ => false,
        }
    }
}

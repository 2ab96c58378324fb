// Service category value object

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    CashDeposit,
    CashWithdrawal,
    ChequePickup,
    DocumentDelivery,
    AccountOpening,
    KycUpdate,
    Other,
}

impl ServiceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceCategory::CashDeposit => "cash_deposit",
            ServiceCategory::CashWithdrawal => "cash_withdrawal",
            ServiceCategory::ChequePickup => "cheque_pickup",
            ServiceCategory::DocumentDelivery => "document_delivery",
            ServiceCategory::AccountOpening => "account_opening",
            ServiceCategory::KycUpdate => "kyc_update",
            ServiceCategory::Other => "other",
        }
    }
}

impl From<&str> for ServiceCategory {
    fn from(s: &str) -> Self {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "cash_deposit" | "deposit" => ServiceCategory::CashDeposit,
            "cash_withdrawal" | "withdrawal" => ServiceCategory::CashWithdrawal,
            "cheque_pickup" | "check_pickup" => ServiceCategory::ChequePickup,
            "document_delivery" => ServiceCategory::DocumentDelivery,
            "account_opening" => ServiceCategory::AccountOpening,
            "kyc_update" | "kyc" => ServiceCategory::KycUpdate,
            _ => ServiceCategory::Other,
        }
    }
}

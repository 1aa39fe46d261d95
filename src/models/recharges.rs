use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum RechargeStatus {
    Success,
}

impl RechargeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RechargeStatus::Success => "Success",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RechargeRecord {
    pub date: String,
    #[serde(rename = "plan")]
    pub plan_label: String,
    pub amount: String,
    pub status: RechargeStatus,
    pub method: String,
}

/// A payment that has been confirmed and is waiting for its processing delay to elapse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingPayment {
    pub plan: String,
    pub method: String,
}

/// Outcome of the recharge-number form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RechargeTarget {
    Ready { mobile: String },
    LoginRequired { mobile: String },
}

pub fn rupees(amount: &str) -> String {
    format!("₹{}", amount)
}

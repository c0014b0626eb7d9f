use std::fmt::Display;

use super::subscription_statuses::SubscriptionStatus;

/// Transaction status reported by the payment gateway notification, grouped by the
/// subscription status it leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    /// capture, settlement, success
    Paid,
    /// pending, challenge
    AwaitingPayment,
    /// deny, cancel, expire, failure
    Failed,
}

impl TransactionStatus {
    /// Case-insensitive. Returns `None` for statuses the reconciler does not handle.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "capture" | "settlement" | "success" => Some(TransactionStatus::Paid),
            "pending" | "challenge" => Some(TransactionStatus::AwaitingPayment),
            "deny" | "cancel" | "expire" | "failure" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }

    pub fn target_status(&self) -> SubscriptionStatus {
        match self {
            TransactionStatus::Paid => SubscriptionStatus::Active,
            TransactionStatus::AwaitingPayment => SubscriptionStatus::Pending,
            TransactionStatus::Failed => SubscriptionStatus::Canceled,
        }
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let value = match self {
            TransactionStatus::Paid => "paid",
            TransactionStatus::AwaitingPayment => "awaiting_payment",
            TransactionStatus::Failed => "failed",
        };
        f.write_str(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paid_statuses_activate() {
        for raw in ["capture", "SETTLEMENT", "Success"] {
            let status = TransactionStatus::parse(raw).unwrap();
            assert_eq!(status, TransactionStatus::Paid);
            assert_eq!(status.target_status(), SubscriptionStatus::Active);
        }
    }

    #[test]
    fn waiting_statuses_stay_pending() {
        for raw in ["pending", "Challenge"] {
            let status = TransactionStatus::parse(raw).unwrap();
            assert_eq!(status.target_status(), SubscriptionStatus::Pending);
        }
    }

    #[test]
    fn failed_statuses_cancel() {
        for raw in ["deny", "CANCEL", "expire", "failure"] {
            let status = TransactionStatus::parse(raw).unwrap();
            assert_eq!(status.target_status(), SubscriptionStatus::Canceled);
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert_eq!(TransactionStatus::parse("foo"), None);
        assert_eq!(TransactionStatus::parse("refund"), None);
        assert_eq!(TransactionStatus::parse(""), None);
    }
}

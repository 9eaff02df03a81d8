//! Payment Entity and Webhook Outcome Mapping
//!
//! The gateway reports transaction status plus a separate fraud
//! verdict. `PaymentOutcome::from_gateway` collapses the pair into the
//! action the order state machine takes.

use chrono::{DateTime, Utc};
use kernel::error::app_error::{AppError, AppResult};
use kernel::id::{OrderId, PaymentId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Payment record, upserted per gateway transaction id
#[derive(Debug, Clone)]
pub struct Payment {
    pub payment_id: PaymentId,
    pub order_id: OrderId,
    pub gateway: String,
    pub method: Option<String>,
    pub transaction_id: String,
    pub status: String,
    pub amount: Decimal,
    pub raw_payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Parsed webhook body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct WebhookEvent {
    pub order_number: String,
    pub transaction_id: String,
    pub transaction_status: String,
    pub fraud_status: Option<String>,
    pub payment_type: Option<String>,
    pub gross_amount: Decimal,
}

/// What the order state machine should do with a webhook
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Mark paid and activate enrollments
    Settle,
    /// Mark failed and delete inactive enrollments
    Fail,
    /// Mark refunded and deactivate enrollments
    Refund,
    /// Leave the order pending
    StillPending,
}

impl PaymentOutcome {
    /// Map gateway transaction and fraud statuses to an outcome.
    /// Statuses the gateway does not document are rejected.
    pub fn from_gateway(transaction_status: &str, fraud_status: Option<&str>) -> AppResult<Self> {
        match transaction_status {
            "settlement" | "capture" => match fraud_status {
                None | Some("accept") => Ok(PaymentOutcome::Settle),
                Some(_) => Ok(PaymentOutcome::Fail),
            },
            "pending" => Ok(PaymentOutcome::StillPending),
            "cancel" | "expire" | "failure" | "deny" => Ok(PaymentOutcome::Fail),
            "refund" | "partial_refund" => Ok(PaymentOutcome::Refund),
            other => Err(AppError::unprocessable(format!(
                "Unknown transaction status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settlement_settles() {
        assert_eq!(
            PaymentOutcome::from_gateway("settlement", None).unwrap(),
            PaymentOutcome::Settle
        );
    }

    #[test]
    fn test_capture_needs_fraud_accept() {
        assert_eq!(
            PaymentOutcome::from_gateway("capture", Some("accept")).unwrap(),
            PaymentOutcome::Settle
        );
        assert_eq!(
            PaymentOutcome::from_gateway("capture", Some("deny")).unwrap(),
            PaymentOutcome::Fail
        );
        assert_eq!(
            PaymentOutcome::from_gateway("capture", Some("challenge")).unwrap(),
            PaymentOutcome::Fail
        );
    }

    #[test]
    fn test_settlement_with_fraud_reject_fails() {
        assert_eq!(
            PaymentOutcome::from_gateway("settlement", Some("deny")).unwrap(),
            PaymentOutcome::Fail
        );
    }

    #[test]
    fn test_pending_stays_pending() {
        assert_eq!(
            PaymentOutcome::from_gateway("pending", None).unwrap(),
            PaymentOutcome::StillPending
        );
    }

    #[test]
    fn test_terminal_failures() {
        for status in ["cancel", "expire", "failure", "deny"] {
            assert_eq!(
                PaymentOutcome::from_gateway(status, None).unwrap(),
                PaymentOutcome::Fail,
                "{status}"
            );
        }
    }

    #[test]
    fn test_refunds() {
        for status in ["refund", "partial_refund"] {
            assert_eq!(
                PaymentOutcome::from_gateway(status, None).unwrap(),
                PaymentOutcome::Refund,
                "{status}"
            );
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = PaymentOutcome::from_gateway("authorize", None).unwrap_err();
        assert_eq!(err.kind(), kernel::error::kind::ErrorKind::UnprocessableEntity);
    }
}

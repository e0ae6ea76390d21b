// verge_checkout/src/checkout/outcome.rs

use crate::checkout::draft::{ClientOrderId, PaymentId};
use crate::checkout::validation::ValidationError;

/// Result of one `submit_order` attempt. The only thing the UI gets back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderOutcome {
  Confirmed { order_id: String, payment_id: PaymentId },
  ValidationError(ValidationError),
  PaymentFailed { reason: String },
  /// Paid but unconfirmed. Needs manual follow-up quoting `payment_id`
  /// and the client-side `order_id`.
  ReconciliationFailed {
    payment_id: PaymentId,
    order_id: ClientOrderId,
    message: String,
  },
}

impl OrderOutcome {
  pub fn is_confirmed(&self) -> bool {
    matches!(self, OrderOutcome::Confirmed { .. })
  }

  /// The payment identifier, if the gateway step succeeded.
  pub fn payment_id(&self) -> Option<&PaymentId> {
    match self {
      OrderOutcome::Confirmed { payment_id, .. } | OrderOutcome::ReconciliationFailed { payment_id, .. } => {
        Some(payment_id)
      }
      _ => None,
    }
  }

  pub fn user_message(&self) -> String {
    match self {
      OrderOutcome::Confirmed { order_id, .. } => format!("Order confirmed. Order ID: {}", order_id),
      OrderOutcome::ValidationError(err) => err.reason.clone(),
      OrderOutcome::PaymentFailed { reason } => format!("Payment Failed. Reason: {}", reason),
      OrderOutcome::ReconciliationFailed {
        payment_id,
        order_id,
        message,
      } => format!(
        "Payment successful, but order creation failed: {}. Please contact support with Payment ID: {} (Order ref: {})",
        message, payment_id, order_id
      ),
    }
  }
}

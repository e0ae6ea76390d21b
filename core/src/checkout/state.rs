// verge_checkout/src/checkout/state.rs

use crate::checkout::outcome::OrderOutcome;
use std::fmt;

/// Where the current attempt stands. Published to the UI on every transition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CheckoutState {
  #[default]
  Idle,
  Validating,
  AwaitingGateway,
  Reconciling,
  Finished(OrderOutcome),
}

impl CheckoutState {
  /// True while an attempt is running. The submit control is disabled.
  pub fn is_in_flight(&self) -> bool {
    matches!(
      self,
      CheckoutState::Validating | CheckoutState::AwaitingGateway | CheckoutState::Reconciling
    )
  }

  /// True only while the hosted checkout is open ("do not close" indicator).
  pub fn blocks_dismissal(&self) -> bool {
    matches!(self, CheckoutState::AwaitingGateway)
  }

  pub fn outcome(&self) -> Option<&OrderOutcome> {
    match self {
      CheckoutState::Finished(outcome) => Some(outcome),
      _ => None,
    }
  }
}

impl fmt::Display for CheckoutState {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      CheckoutState::Idle => "idle",
      CheckoutState::Validating => "validating",
      CheckoutState::AwaitingGateway => "awaiting_gateway",
      CheckoutState::Reconciling => "reconciling",
      CheckoutState::Finished(OrderOutcome::Confirmed { .. }) => "confirmed",
      CheckoutState::Finished(OrderOutcome::ValidationError(_)) => "validation_error",
      CheckoutState::Finished(OrderOutcome::PaymentFailed { .. }) => "payment_failed",
      CheckoutState::Finished(OrderOutcome::ReconciliationFailed { .. }) => "reconciliation_failed",
    };
    f.write_str(name)
  }
}

// verge_checkout/src/checkout/gateway.rs

//! The hosted payment checkout, seen as a single awaited call.

use crate::checkout::draft::{OrderDraft, PaymentId};
use crate::checkout::money::Amount;
use crate::error::CheckoutError;
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Prefill {
  pub name: String,
  pub email: String,
  pub contact: String,
}

/// What the hosted checkout is opened with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayOptions {
  /// Total in the currency's minor unit.
  pub amount_minor: u64,
  pub currency: String,
  pub description: String,
  pub merchant_name: String,
  pub prefill: Prefill,
}

impl GatewayOptions {
  pub fn for_draft(draft: &OrderDraft, total: Amount, merchant_name: &str) -> Result<Self, CheckoutError> {
    Ok(Self {
      amount_minor: total.to_minor()?,
      currency: total.currency.code().to_string(),
      description: draft.description(merchant_name),
      merchant_name: draft.display_merchant(merchant_name),
      prefill: Prefill {
        name: draft.contact.name.clone(),
        email: draft.contact.email.clone(),
        contact: draft.contact.phone.clone(),
      },
    })
  }
}

/// The gateway declined, errored, or the user dismissed it. `reason` is
/// passed to the user verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("payment gateway failure: {reason}")]
pub struct GatewayFailure {
  pub reason: String,
}

impl GatewayFailure {
  pub fn new(reason: impl Into<String>) -> Self {
    Self { reason: reason.into() }
  }

  pub fn cancelled() -> Self {
    Self::new("cancelled")
  }

  pub fn is_cancelled(&self) -> bool {
    self.reason == "cancelled"
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Opens the hosted checkout and resolves once the user has paid or given up.
  async fn open(&self, options: GatewayOptions) -> Result<PaymentId, GatewayFailure>;
}

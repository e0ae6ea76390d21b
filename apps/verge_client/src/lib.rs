// verge_client/src/lib.rs

//! HTTP-facing half of the Verge checkout: configuration, the reqwest-backed
//! order backend, order/booking lookups, and the signed-in session.

pub mod config;
pub mod errors;
pub mod services;
pub mod session;
pub mod telemetry;

pub use crate::config::AppConfig;
pub use crate::errors::{ClientError, Result};
pub use crate::services::{Booking, HttpOrderBackend, OrderHistory, OrderStatus, OrderSummary};
pub use crate::session::{Session, UserProfile};

use std::sync::Arc;
use verge_checkout::{CheckoutOrchestrator, PaymentGateway};

/// Wires a checkout orchestrator against the configured backend.
pub fn checkout_orchestrator<G>(config: &AppConfig, gateway: Arc<G>) -> Result<CheckoutOrchestrator<G, HttpOrderBackend>>
where
  G: PaymentGateway + 'static,
{
  let backend = Arc::new(HttpOrderBackend::new(config)?);
  Ok(CheckoutOrchestrator::new(gateway, backend, config.merchant_name.clone()))
}

// src/lib.rs

//! verge_checkout: client-side checkout orchestration for the Verge festival app.
//!
//! A checkout attempt runs as a small async step flow:
//!  - `validate_draft` checks the user's draft locally and computes the total.
//!  - `open_gateway` hands the total (in minor units) to the hosted payment checkout.
//!  - `reconcile_order` persists the order against the captured payment.
//!
//! The flow engine (`Flow`, `ContextData`, `StepControl`) is generic and lives in
//! `core`/`flow`; the domain model and `CheckoutOrchestrator` live in `checkout`.
//! Payment and order persistence are reached through the `PaymentGateway` and
//! `OrderBackend` traits, so the crate itself does no I/O.

pub mod checkout;
pub mod core;
pub mod error;
pub mod flow;

// --- Re-exports for the Public API ---

pub use crate::core::context::Handler;
pub use crate::core::context_data::ContextData;
pub use crate::core::control::{FlowResult, StepControl};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::flow::Flow;

pub use crate::checkout::{
  Amount, BackendError, Cart, CheckoutKind, CheckoutOrchestrator, CheckoutState, ClientOrderId, ContactInfo,
  Currency, GatewayCancelHandle, GatewayFailure, GatewayOptions, HostelProfile, LineItem, OrderAck, OrderBackend,
  OrderDraft, OrderOutcome, OrderRequest, PaymentGateway, PaymentId, PendingReconciliation, ShippingDetails,
  ValidationError, HOSTEL_PRICE_PER_DAY, MERCH_PLATFORM_FEE,
};

pub use crate::error::{CheckoutError, CheckoutResult};

/*
    Checkout attempt:
    1. Build an `OrderDraft` (merch cart + shipping, or a hostel booking).
    2. Create a `CheckoutOrchestrator` over a `PaymentGateway` and an `OrderBackend`.
    3. `subscribe()` to follow `CheckoutState` in the UI.
    4. `submit_order(&mut draft).await` returns an `OrderOutcome`; on
       `ReconciliationFailed` the payment stays pending and the next submit
       of the same total retries the order creation without charging again.
*/

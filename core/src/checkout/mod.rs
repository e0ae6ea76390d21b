// verge_checkout/src/checkout/mod.rs

//! The checkout domain: drafts, validation, the gateway and backend seams,
//! and the orchestrator that sequences them.

pub mod backend;
pub mod cart;
pub mod draft;
pub mod gateway;
pub mod money;
pub mod orchestrator;
pub mod outcome;
pub mod state;
pub mod validation;

pub use backend::{BackendError, HostelBookingRequest, MerchOrderRequest, OrderBackend, OrderRequest};
pub use cart::{Cart, LineItem, Variant};
pub use draft::{
  CheckoutKind, ClientOrderId, ContactInfo, HostelProfile, OrderAck, OrderDraft, PaymentId, ShippingDetails,
  DEFAULT_HOSTEL_DAYS, HOSTEL_PRICE_PER_DAY, MAX_HOSTEL_DAYS, MERCH_PLATFORM_FEE,
};
pub use gateway::{GatewayFailure, GatewayOptions, PaymentGateway, Prefill};
pub use money::{Amount, Currency};
pub use orchestrator::{CheckoutOrchestrator, CheckoutRun, GatewayCancelHandle, PendingReconciliation};
pub use outcome::OrderOutcome;
pub use state::CheckoutState;
pub use validation::{validate_draft, ValidationError};

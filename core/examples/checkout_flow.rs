// verge_checkout/examples/checkout_flow.rs

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;
use verge_checkout::{
  BackendError, Cart, CheckoutOrchestrator, ContactInfo, GatewayFailure, GatewayOptions, LineItem, OrderAck,
  OrderBackend, OrderDraft, OrderOutcome, OrderRequest, PaymentGateway, PaymentId, ShippingDetails,
};

// 1. A gateway that always pays.
struct SandboxGateway;

#[async_trait]
impl PaymentGateway for SandboxGateway {
  async fn open(&self, options: GatewayOptions) -> Result<PaymentId, GatewayFailure> {
    info!(amount_minor = options.amount_minor, "Sandbox gateway charging.");
    Ok(PaymentId::new("pay_sandbox_1"))
  }
}

// 2. A backend whose first call drops the connection.
#[derive(Default)]
struct FlakyBackend {
  failed_once: AtomicBool,
}

#[async_trait]
impl OrderBackend for FlakyBackend {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, BackendError> {
    if !self.failed_once.swap(true, Ordering::SeqCst) {
      return Err(BackendError::Transport("connection dropped".to_string()));
    }
    Ok(OrderAck {
      order_id: request.client_order_id().to_string(),
      status: "processing".to_string(),
    })
  }
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Checkout Flow Example ---");

  let cart: Cart = vec![LineItem::new("tee-01", "Verge Tee", 600, 1)].into_iter().collect();
  let mut draft = OrderDraft::merch(
    "user-1",
    ContactInfo {
      name: "Asha".to_string(),
      email: "asha@example.com".to_string(),
      phone: "9876543210".to_string(),
    },
    cart,
    ShippingDetails {
      address: "Hostel Road".to_string(),
      city: "Pune".to_string(),
      pincode: "411005".to_string(),
    },
  );

  let mut checkout = CheckoutOrchestrator::new(Arc::new(SandboxGateway), Arc::new(FlakyBackend::default()), "VERGE 2026");

  // 3. First attempt: paid, but the order is not confirmed.
  let first = checkout.submit_order(&mut draft).await;
  info!("First attempt: {}", first.user_message());

  // 4. Retry: the captured payment is reused, the gateway is not opened again.
  let second = checkout.submit_order(&mut draft).await;
  info!("Retry: {}", second.user_message());

  if let OrderOutcome::Confirmed { order_id, .. } = second {
    info!(%order_id, cart_empty = draft.is_empty(), "--- Checkout Flow Example Finished ---");
  }
}

// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};
use tokio::sync::Notify;
use tracing::Level;
use verge_checkout::{
  BackendError, Cart, CheckoutError, ContactInfo, ContextData, GatewayFailure, GatewayOptions, HostelProfile,
  LineItem, OrderAck, OrderBackend, OrderDraft, OrderRequest, PaymentGateway, PaymentId, ShippingDetails,
  StepControl,
};

// --- Flow engine fixtures ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("Checkout framework error: {0}")]
  Framework(String), // Debug text of the CheckoutError, for Eq comparison

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<CheckoutError> for TestError {
  fn from(err: CheckoutError) -> Self {
    TestError::Framework(format!("{:?}", err))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> verge_checkout::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      HANDLER_EXEC_COUNTER.fetch_add(1, Ordering::SeqCst);
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      tracing::debug!(target: "test_handlers", step = step_name, "executed, counter: {}", guard.counter);
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(StepControl::Stop);
      }
      Ok(StepControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> verge_checkout::Handler<TestContext, TestError> {
  Box::new(move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      tracing::warn!(target: "test_handlers", step = step_name, "failing with: '{}'", error_message);
      Err(TestError::Handler(error_message.to_string()))
    })
  })
}

// --- Tracing ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub static HANDLER_EXEC_COUNTER: Lazy<Arc<AtomicUsize>> = Lazy::new(|| Arc::new(AtomicUsize::new(0)));

pub fn reset_counters() {
  HANDLER_EXEC_COUNTER.store(0, Ordering::SeqCst);
}

// --- Recording gateway ---
enum GatewayScript {
  Reply(Result<PaymentId, GatewayFailure>),
  Hang,
}

/// Replays scripted gateway replies in order and records every call.
/// With no script left it behaves like a user who never finishes paying.
#[derive(Default)]
pub struct MockGateway {
  script: Mutex<VecDeque<GatewayScript>>,
  pub calls: AtomicUsize,
  pub options: Mutex<Vec<GatewayOptions>>,
}

impl MockGateway {
  pub fn paying(payment_id: &str) -> Arc<Self> {
    let gateway = Self::default();
    gateway.push_ok(payment_id);
    Arc::new(gateway)
  }

  pub fn failing(reason: &str) -> Arc<Self> {
    let gateway = Self::default();
    gateway
      .script
      .lock()
      .push_back(GatewayScript::Reply(Err(GatewayFailure::new(reason))));
    Arc::new(gateway)
  }

  pub fn hanging() -> Arc<Self> {
    let gateway = Self::default();
    gateway.script.lock().push_back(GatewayScript::Hang);
    Arc::new(gateway)
  }

  pub fn push_ok(&self, payment_id: &str) {
    self
      .script
      .lock()
      .push_back(GatewayScript::Reply(Ok(PaymentId::new(payment_id))));
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn last_options(&self) -> Option<GatewayOptions> {
    self.options.lock().last().cloned()
  }
}

#[async_trait]
impl PaymentGateway for MockGateway {
  async fn open(&self, options: GatewayOptions) -> Result<PaymentId, GatewayFailure> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.options.lock().push(options);
    let next = self.script.lock().pop_front();
    match next {
      Some(GatewayScript::Reply(reply)) => reply,
      Some(GatewayScript::Hang) | None => std::future::pending().await,
    }
  }
}

// --- Recording backend ---
/// Replays scripted backend replies in order and records every request.
#[derive(Default)]
pub struct MockBackend {
  replies: Mutex<VecDeque<Result<OrderAck, BackendError>>>,
  pub calls: AtomicUsize,
  pub requests: Mutex<Vec<OrderRequest>>,
}

impl MockBackend {
  pub fn with_replies(replies: Vec<Result<OrderAck, BackendError>>) -> Arc<Self> {
    Arc::new(Self {
      replies: Mutex::new(replies.into()),
      ..Self::default()
    })
  }

  pub fn accepting(order_id: &str) -> Arc<Self> {
    Self::with_replies(vec![Ok(ack(order_id))])
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn recorded(&self) -> Vec<OrderRequest> {
    self.requests.lock().clone()
  }
}

#[async_trait]
impl OrderBackend for MockBackend {
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, BackendError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.requests.lock().push(request.clone());
    let next = self.replies.lock().pop_front();
    next.unwrap_or_else(|| Err(BackendError::Transport("no scripted reply".to_string())))
  }
}

// --- Gated backend ---
/// Accepts every order, but only after `release()` has been called.
pub struct GatedBackend {
  order_id: String,
  gate: Notify,
  pub calls: AtomicUsize,
}

impl GatedBackend {
  pub fn accepting(order_id: &str) -> Arc<Self> {
    Arc::new(Self {
      order_id: order_id.to_string(),
      gate: Notify::new(),
      calls: AtomicUsize::new(0),
    })
  }

  pub fn release(&self) {
    self.gate.notify_one();
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl OrderBackend for GatedBackend {
  async fn create_order(&self, _request: &OrderRequest) -> Result<OrderAck, BackendError> {
    self.calls.fetch_add(1, Ordering::SeqCst);
    self.gate.notified().await;
    Ok(ack(&self.order_id))
  }
}

pub fn ack(order_id: &str) -> OrderAck {
  OrderAck {
    order_id: order_id.to_string(),
    status: "processing".to_string(),
  }
}

pub fn network_error() -> BackendError {
  BackendError::Transport("connection reset by peer".to_string())
}

// --- Draft builders ---
pub fn contact() -> ContactInfo {
  ContactInfo {
    name: "Asha Patil".to_string(),
    email: "asha@example.com".to_string(),
    phone: "9876543210".to_string(),
  }
}

pub fn shipping() -> ShippingDetails {
  ShippingDetails {
    address: "Hostel Road, Block C".to_string(),
    city: "Pune".to_string(),
    pincode: "411005".to_string(),
  }
}

/// One tee at 600; with the platform fee the total is 620.
pub fn merch_draft() -> OrderDraft {
  let cart: Cart = vec![LineItem::new("tee-01", "Verge Tee", 600, 1).with_variant(Some("L"), Some("Black"))]
    .into_iter()
    .collect();
  OrderDraft::merch("user-42", contact(), cart, shipping())
}

pub fn hostel_draft(hostel_name: &str, gender: &str, days: u32) -> OrderDraft {
  OrderDraft::hostel(
    "user-42",
    contact(),
    hostel_name,
    days,
    HostelProfile {
      gender: gender.to_string(),
      college_name: "COEP".to_string(),
    },
  )
}

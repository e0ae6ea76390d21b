// verge_checkout/src/checkout/orchestrator.rs

//! Sequences validation, the payment gateway and order reconciliation over a
//! three-step `Flow`, publishing every transition on a watch channel.

use crate::checkout::backend::{OrderBackend, OrderRequest};
use crate::checkout::draft::{ClientOrderId, OrderDraft, PaymentId};
use crate::checkout::gateway::{GatewayFailure, GatewayOptions, PaymentGateway};
use crate::checkout::money::Amount;
use crate::checkout::outcome::OrderOutcome;
use crate::checkout::state::CheckoutState;
use crate::checkout::validation::{validate_draft, ValidationError};
use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::core::step::SkipCondition;
use crate::error::CheckoutError;
use crate::flow::Flow;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info, instrument, warn};

pub const STEP_VALIDATE: &str = "validate_draft";
pub const STEP_GATEWAY: &str = "open_gateway";
pub const STEP_RECONCILE: &str = "reconcile_order";

/// Source of unix milliseconds for client order identifiers.
pub type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// A payment captured by the gateway whose order was never confirmed,
/// together with the draft it paid for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReconciliation {
  pub payment_id: PaymentId,
  pub order_id: ClientOrderId,
  pub amount: Amount,
  pub draft: OrderDraft,
}

/// Working state of one `submit_order` attempt, shared by the flow handlers.
#[derive(Debug, Clone)]
pub struct CheckoutRun {
  pub draft: OrderDraft,
  pub pending: Option<PendingReconciliation>,
  pub state: CheckoutState,
  pub total: Option<Amount>,
  pub payment_id: Option<PaymentId>,
  pub order_id: Option<ClientOrderId>,
  pub outcome: Option<OrderOutcome>,
  cancel_epoch: u64,
}

impl CheckoutRun {
  fn new(draft: OrderDraft, pending: Option<PendingReconciliation>) -> Self {
    Self {
      draft,
      pending,
      state: CheckoutState::Idle,
      total: None,
      payment_id: None,
      order_id: None,
      outcome: None,
      cancel_epoch: 0,
    }
  }
}

/// Cancels a hosted checkout that is currently open. Has no effect in any
/// other phase; reconciliation cannot be cancelled.
#[derive(Debug, Clone)]
pub struct GatewayCancelHandle {
  epoch: Arc<watch::Sender<u64>>,
}

impl GatewayCancelHandle {
  pub fn cancel(&self) {
    self.epoch.send_modify(|epoch| *epoch = epoch.wrapping_add(1));
  }
}

struct Collaborators<G, B> {
  gateway: Arc<G>,
  backend: Arc<B>,
  merchant_name: String,
  clock: Clock,
  state_tx: Arc<watch::Sender<CheckoutState>>,
  cancel_tx: Arc<watch::Sender<u64>>,
}

impl<G, B> Clone for Collaborators<G, B> {
  fn clone(&self) -> Self {
    Self {
      gateway: Arc::clone(&self.gateway),
      backend: Arc::clone(&self.backend),
      merchant_name: self.merchant_name.clone(),
      clock: Arc::clone(&self.clock),
      state_tx: Arc::clone(&self.state_tx),
      cancel_tx: Arc::clone(&self.cancel_tx),
    }
  }
}

fn publish(state_tx: &watch::Sender<CheckoutState>, ctx_data: &ContextData<CheckoutRun>, state: CheckoutState) {
  ctx_data.write().state = state.clone();
  info!(state = %state, "Checkout state changed.");
  state_tx.send_replace(state);
}

pub struct CheckoutOrchestrator<G, B>
where
  G: PaymentGateway + 'static,
  B: OrderBackend + 'static,
{
  deps: Collaborators<G, B>,
  flow: Flow<CheckoutRun, CheckoutError>,
  pending: Option<PendingReconciliation>,
}

impl<G, B> CheckoutOrchestrator<G, B>
where
  G: PaymentGateway + 'static,
  B: OrderBackend + 'static,
{
  pub fn new(gateway: Arc<G>, backend: Arc<B>, merchant_name: impl Into<String>) -> Self {
    let (state_tx, _) = watch::channel(CheckoutState::Idle);
    let (cancel_tx, _) = watch::channel(0u64);
    let deps = Collaborators {
      gateway,
      backend,
      merchant_name: merchant_name.into(),
      clock: Arc::new(|| chrono::Utc::now().timestamp_millis()),
      state_tx: Arc::new(state_tx),
      cancel_tx: Arc::new(cancel_tx),
    };
    let flow = build_flow(&deps);
    Self {
      deps,
      flow,
      pending: None,
    }
  }

  /// Replaces the clock used for client order identifiers.
  pub fn with_clock(mut self, clock: impl Fn() -> i64 + Send + Sync + 'static) -> Self {
    self.deps.clock = Arc::new(clock);
    self.flow = build_flow(&self.deps);
    self
  }

  pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
    self.deps.state_tx.subscribe()
  }

  pub fn state(&self) -> CheckoutState {
    self.deps.state_tx.borrow().clone()
  }

  pub fn cancel_handle(&self) -> GatewayCancelHandle {
    GatewayCancelHandle {
      epoch: Arc::clone(&self.deps.cancel_tx),
    }
  }

  pub fn pending_reconciliation(&self) -> Option<&PendingReconciliation> {
    self.pending.as_ref()
  }

  /// Forgets the pending payment once it has been reconciled out of band.
  pub fn resolve_pending(&mut self) -> Option<PendingReconciliation> {
    let resolved = self.pending.take();
    if let Some(pending) = &resolved {
      info!(payment_id = %pending.payment_id, "Pending reconciliation resolved manually.");
      self.deps.state_tx.send_replace(CheckoutState::Idle);
    }
    resolved
  }

  /// Runs one checkout attempt for `draft`.
  ///
  /// The draft is cleared only on `Confirmed`. After `ReconciliationFailed`
  /// the captured payment is kept, and the next call for the same order and
  /// total retries the order creation with it instead of opening the gateway
  /// again. Any other draft is rejected until the payment is resolved.
  #[instrument(name = "CheckoutOrchestrator::submit_order", skip_all, fields(kind = draft.kind.label(), user_id = %draft.user_id))]
  pub async fn submit_order(&mut self, draft: &mut OrderDraft) -> OrderOutcome {
    let ctx_data = ContextData::new(CheckoutRun::new(draft.clone(), self.pending.clone()));

    let flow_result = self.flow.run(ctx_data.clone()).await;

    let run = ctx_data.read().clone();
    let outcome = match flow_result {
      Ok(_) => match run.outcome.clone() {
        Some(outcome) => outcome,
        None => fold_error(&run, CheckoutError::Internal("flow finished without an outcome".to_string())),
      },
      Err(err) => fold_error(&run, err),
    };

    match &outcome {
      OrderOutcome::Confirmed { order_id, payment_id } => {
        info!(%order_id, %payment_id, "Order confirmed.");
        draft.clear();
        self.pending = None;
      }
      OrderOutcome::ReconciliationFailed {
        payment_id,
        order_id,
        message,
      } => {
        error!(%payment_id, %order_id, %message, "Payment captured but order not confirmed.");
        if let Some(amount) = run.total {
          self.pending = Some(PendingReconciliation {
            payment_id: payment_id.clone(),
            order_id: order_id.clone(),
            amount,
            draft: run.draft.clone(),
          });
        }
      }
      OrderOutcome::PaymentFailed { reason } => warn!(%reason, "Payment did not complete."),
      OrderOutcome::ValidationError(err) => info!(field = %err.field, "Draft rejected."),
    }

    self.deps.state_tx.send_replace(CheckoutState::Finished(outcome.clone()));
    outcome
  }
}

/// Maps an error that escaped the flow onto an outcome. A captured payment
/// always surfaces as `ReconciliationFailed`; otherwise the phase decides.
fn fold_error(run: &CheckoutRun, err: CheckoutError) -> OrderOutcome {
  error!(phase = %run.state, error = %err, "Checkout flow failed.");
  if let (Some(payment_id), Some(order_id)) = (&run.payment_id, &run.order_id) {
    return OrderOutcome::ReconciliationFailed {
      payment_id: payment_id.clone(),
      order_id: order_id.clone(),
      message: err.to_string(),
    };
  }
  match run.state {
    CheckoutState::AwaitingGateway | CheckoutState::Reconciling => {
      OrderOutcome::PaymentFailed { reason: err.to_string() }
    }
    _ => OrderOutcome::ValidationError(ValidationError::new("draft", err.to_string())),
  }
}

fn build_flow<G, B>(deps: &Collaborators<G, B>) -> Flow<CheckoutRun, CheckoutError>
where
  G: PaymentGateway + 'static,
  B: OrderBackend + 'static,
{
  let payment_captured: SkipCondition<CheckoutRun> =
    Arc::new(|ctx_data: ContextData<CheckoutRun>| ctx_data.read().payment_id.is_some());

  let mut flow = Flow::<CheckoutRun, CheckoutError>::new(&[
    (STEP_VALIDATE, false, None),
    (STEP_GATEWAY, false, Some(payment_captured)),
    (STEP_RECONCILE, false, None),
  ]);

  let state_tx = Arc::clone(&deps.state_tx);
  flow.before(STEP_VALIDATE, move |ctx_data: ContextData<CheckoutRun>| {
    publish(&state_tx, &ctx_data, CheckoutState::Validating);
    Box::pin(async move { Ok::<_, CheckoutError>(StepControl::Continue) })
  });
  flow.on(STEP_VALIDATE, |ctx_data: ContextData<CheckoutRun>| {
    Box::pin(async move { validate_step(&ctx_data) })
  });

  let state_tx = Arc::clone(&deps.state_tx);
  let cancel_tx = Arc::clone(&deps.cancel_tx);
  flow.before(STEP_GATEWAY, move |ctx_data: ContextData<CheckoutRun>| {
    ctx_data.write().cancel_epoch = *cancel_tx.borrow();
    publish(&state_tx, &ctx_data, CheckoutState::AwaitingGateway);
    Box::pin(async move { Ok::<_, CheckoutError>(StepControl::Continue) })
  });
  let gateway_deps = deps.clone();
  flow.on(STEP_GATEWAY, move |ctx_data: ContextData<CheckoutRun>| {
    Box::pin(gateway_step(gateway_deps.clone(), ctx_data))
  });

  let state_tx = Arc::clone(&deps.state_tx);
  flow.before(STEP_RECONCILE, move |ctx_data: ContextData<CheckoutRun>| {
    publish(&state_tx, &ctx_data, CheckoutState::Reconciling);
    Box::pin(async move { Ok::<_, CheckoutError>(StepControl::Continue) })
  });
  let backend = Arc::clone(&deps.backend);
  flow.on(STEP_RECONCILE, move |ctx_data: ContextData<CheckoutRun>| {
    Box::pin(reconcile_step(Arc::clone(&backend), ctx_data))
  });

  flow
}

/// Validates the draft and picks up a pending payment if it was made for
/// this same order and total.
fn validate_step(ctx_data: &ContextData<CheckoutRun>) -> Result<StepControl, CheckoutError> {
  let mut guard = ctx_data.write();
  let total = match validate_draft(&guard.draft) {
    Ok(total) => total,
    Err(err) => {
      guard.outcome = Some(OrderOutcome::ValidationError(err));
      return Ok(StepControl::Stop);
    }
  };
  guard.total = Some(total);

  if let Some(pending) = guard.pending.clone() {
    if !pending.draft.same_order(&guard.draft) {
      guard.outcome = Some(OrderOutcome::ValidationError(ValidationError::new(
        "cart",
        format!(
          "Payment {} was made for a different {} order that is still awaiting confirmation. Contact support before placing a new order.",
          pending.payment_id,
          pending.draft.kind.label()
        ),
      )));
      return Ok(StepControl::Stop);
    }
    if pending.amount != total {
      guard.outcome = Some(OrderOutcome::ValidationError(ValidationError::new(
        "total",
        format!(
          "Payment {} for {} is still awaiting confirmation. Contact support before placing a different order.",
          pending.payment_id, pending.amount
        ),
      )));
      return Ok(StepControl::Stop);
    }
    info!(payment_id = %pending.payment_id, "Retrying order creation with captured payment.");
    guard.payment_id = Some(pending.payment_id);
    guard.order_id = Some(pending.order_id);
  }
  Ok(StepControl::Continue)
}

/// Opens the hosted checkout and records the captured payment.
async fn gateway_step<G, B>(
  deps: Collaborators<G, B>,
  ctx_data: ContextData<CheckoutRun>,
) -> Result<StepControl, CheckoutError>
where
  G: PaymentGateway + 'static,
  B: OrderBackend + 'static,
{
  let (options, epoch) = {
    let guard = ctx_data.read();
    let total = guard
      .total
      .ok_or_else(|| CheckoutError::Internal("gateway step reached without a validated total".to_string()))?;
    (
      GatewayOptions::for_draft(&guard.draft, total, &deps.merchant_name)?,
      guard.cancel_epoch,
    )
  };
  info!(amount_minor = options.amount_minor, currency = %options.currency, "Opening payment gateway.");

  let mut cancel_rx = deps.cancel_tx.subscribe();
  let cancelled = async move {
    let closed = cancel_rx.wait_for(|current| *current != epoch).await.is_err();
    if closed {
      std::future::pending::<()>().await;
    }
  };
  let result = tokio::select! {
    result = deps.gateway.open(options) => result,
    _ = cancelled => Err(GatewayFailure::cancelled()),
  };

  let mut guard = ctx_data.write();
  match result {
    Ok(payment_id) => {
      info!(%payment_id, "Payment captured.");
      let order_id = ClientOrderId::generate(&guard.draft, (deps.clock)());
      guard.order_id = Some(order_id);
      guard.payment_id = Some(payment_id);
      Ok(StepControl::Continue)
    }
    Err(failure) => {
      if failure.is_cancelled() {
        info!("Hosted checkout cancelled.");
      } else {
        warn!(reason = %failure.reason, "Gateway reported a failure.");
      }
      guard.outcome = Some(OrderOutcome::PaymentFailed { reason: failure.reason });
      Ok(StepControl::Stop)
    }
  }
}

/// Persists the order against the captured payment.
async fn reconcile_step<B>(backend: Arc<B>, ctx_data: ContextData<CheckoutRun>) -> Result<StepControl, CheckoutError>
where
  B: OrderBackend + 'static,
{
  let (request, payment_id, order_id) = {
    let guard = ctx_data.read();
    let (Some(payment_id), Some(order_id)) = (guard.payment_id.clone(), guard.order_id.clone()) else {
      return Err(CheckoutError::Internal(
        "reconciliation reached without a captured payment".to_string(),
      ));
    };
    (OrderRequest::from_draft(&guard.draft, &payment_id, &order_id), payment_id, order_id)
  };

  let outcome = match backend.create_order(&request).await {
    Ok(ack) => OrderOutcome::Confirmed {
      order_id: ack.order_id,
      payment_id,
    },
    Err(err) => OrderOutcome::ReconciliationFailed {
      payment_id,
      order_id,
      message: err.user_message(),
    },
  };
  ctx_data.write().outcome = Some(outcome);
  Ok(StepControl::Continue)
}

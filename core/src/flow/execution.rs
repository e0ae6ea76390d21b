// verge_checkout/src/flow/execution.rs

//! `Flow::run()`: executes the steps and their handlers in order.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::{FlowResult, StepControl};
use crate::core::step::StepDef;
use crate::error::CheckoutError;
use crate::flow::definition::Flow;
use tracing::{event, instrument, span, Instrument, Level};

/// What a single phase (`before`/`on`/`after`) decided.
enum PhaseOutcome {
  Continue,
  Stopped,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CheckoutError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// Returns `FlowResult::Stopped` as soon as a handler returns
  /// `StepControl::Stop`, and the first handler error otherwise. A
  /// non-optional step without any handler fails with
  /// `CheckoutError::HandlerMissing`, converted into `Err`.
  #[instrument(
        name = "Flow::run",
        skip_all,
        fields(
            flow_context_type = %std::any::type_name::<TData>(),
            num_steps = self.steps.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<FlowResult, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_span = span!(
        Level::INFO,
        "flow_step",
        step_name = step_def.name.as_str(),
        step_index = step_idx,
        optional = step_def.optional
      );
      // Instrument rather than enter: the span guard must not live across awaits.
      match self.run_step(step_def, &ctx_data).instrument(step_span).await? {
        PhaseOutcome::Continue => {}
        PhaseOutcome::Stopped => return Ok(FlowResult::Stopped),
      }
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowResult::Completed)
  }

  async fn run_step(&self, step_def: &StepDef<TData>, ctx_data: &ContextData<TData>) -> Result<PhaseOutcome, Err> {
    let step_name = step_def.name.as_str();

    if let Some(skip_cond_fn) = &step_def.skip_if {
      if skip_cond_fn(ctx_data.clone()) {
        event!(Level::INFO, "Step skipped due to 'skip_if' condition.");
        return Ok(PhaseOutcome::Continue);
      }
    }

    let has_handlers = [&self.before, &self.on, &self.after]
      .iter()
      .any(|phase| phase.get(step_name).map_or(false, |v| !v.is_empty()));

    if !has_handlers {
      if step_def.optional {
        event!(Level::DEBUG, "Optional step has no handlers, skipping.");
        return Ok(PhaseOutcome::Continue);
      }
      event!(Level::ERROR, "Non-optional step has no handlers.");
      return Err(Err::from(CheckoutError::HandlerMissing {
        step_name: step_def.name.clone(),
      }));
    }

    for (phase_name, phase) in [("before", &self.before), ("on", &self.on), ("after", &self.after)] {
      if let Some(handlers) = phase.get(step_name) {
        if let PhaseOutcome::Stopped = run_phase(phase_name, handlers, ctx_data).await? {
          return Ok(PhaseOutcome::Stopped);
        }
      }
    }
    event!(Level::DEBUG, "Step finished.");
    Ok(PhaseOutcome::Continue)
  }
}

async fn run_phase<TData, Err>(
  phase_name: &'static str,
  handlers: &[Handler<TData, Err>],
  ctx_data: &ContextData<TData>,
) -> Result<PhaseOutcome, Err>
where
  TData: 'static + Send + Sync,
  Err: std::fmt::Display,
{
  for (handler_idx, handler_fn) in handlers.iter().enumerate() {
    event!(Level::TRACE, phase = phase_name, handler_index = handler_idx, "Executing handler.");
    match handler_fn(ctx_data.clone()).await {
      Ok(StepControl::Continue) => {}
      Ok(StepControl::Stop) => {
        event!(Level::INFO, phase = phase_name, "Flow stopped by a handler.");
        return Ok(PhaseOutcome::Stopped);
      }
      Err(e) => {
        event!(Level::ERROR, phase = phase_name, error = %e, "Handler failed.");
        return Err(e);
      }
    }
  }
  Ok(PhaseOutcome::Continue)
}

// verge_checkout/src/flow/hooks.rs

//! Registration of `before`, `on` and `after` handlers for flow steps.

use crate::core::context::Handler;
use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use crate::error::CheckoutError;
use crate::flow::definition::Flow;
use std::collections::HashMap;
use std::future::Future;

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CheckoutError> + Send + Sync + 'static,
{
  /// Registers a handler that runs before the step's `on` handlers.
  ///
  /// The handler's own error type only has to convert into the flow's `Err`.
  pub fn before<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.before, step_name, wrap(handler_fn));
  }

  /// Registers a handler for the main phase of the step.
  pub fn on<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.on, step_name, wrap(handler_fn));
  }

  /// Registers a handler that runs after the step's `on` handlers.
  pub fn after<F, HandlerErr>(
    &mut self,
    step_name: &str,
    handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
    HandlerErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_step_exists(step_name);
    push_handler(&mut self.after, step_name, wrap(handler_fn));
  }
}

fn wrap<TData, Err, F, HandlerErr>(
  handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static,
) -> Handler<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: 'static,
  F: Future<Output = Result<StepControl, HandlerErr>> + Send + 'static,
  HandlerErr: Into<Err> + Send + Sync + 'static,
{
  Box::new(move |ctx_data| {
    let user_fut = handler_fn(ctx_data);
    Box::pin(async move { user_fut.await.map_err(Into::into) })
  })
}

fn push_handler<TData, Err>(
  phase: &mut HashMap<String, Vec<Handler<TData, Err>>>,
  step_name: &str,
  handler: Handler<TData, Err>,
) where
  TData: 'static + Send + Sync,
{
  phase.entry(step_name.to_string()).or_default().push(handler);
}

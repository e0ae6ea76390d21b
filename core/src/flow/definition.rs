// verge_checkout/src/flow/definition.rs

//! The `Flow<TData, Err>` struct and its construction.

use crate::core::context::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::CheckoutError;
use std::collections::HashMap;

/// An ordered list of named steps, each with `before`/`on`/`after` handlers,
/// run against a shared `ContextData<TData>`.
///
/// `Err` must be constructible from `CheckoutError` so that framework errors
/// (a non-optional step without handlers) surface in the caller's error type.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CheckoutError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<TData>>,

  pub(crate) before: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<Handler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<Handler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<CheckoutError> + Send + Sync + 'static,
{
  /// Creates a flow from `(name, optional, skip_if)` step definitions.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      steps,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Step names in execution order.
  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  /// Panics if the step is unknown. A typo in a step name is a wiring bug,
  /// not a runtime condition.
  pub(crate) fn ensure_step_exists(&self, step_name: &str) {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Checkout flow setup error: step '{}' not found in flow definition.", step_name);
    }
  }

  /// Replaces the skip condition of an existing step.
  pub fn set_skip_condition(
    &mut self,
    step_name: &str,
    skip_if: Option<SkipCondition<TData>>,
  ) -> Result<(), CheckoutError> {
    let step = self
      .steps
      .iter_mut()
      .find(|s| s.name == step_name)
      .ok_or_else(|| CheckoutError::StepNotFound {
        step_name: step_name.to_string(),
      })?;
    step.skip_if = skip_if;
    Ok(())
  }
}

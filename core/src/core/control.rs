// verge_checkout/src/core/control.rs

//! Signals for controlling flow execution and the outcome of a flow run.

/// Signal from a handler indicating whether the flow should continue or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Continue with the remaining handlers and steps.
  Continue,
  /// Halt the flow immediately. Used when a checkout attempt reaches a
  /// terminal outcome early (validation rejected, payment failed).
  Stop,
}

/// Outcome of a full flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowResult {
  /// Every non-skipped step ran to completion.
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}

// verge_checkout/src/core/context.rs

//! The `Handler<TData, Err>` type run by flow steps.

use crate::core::context_data::ContextData;
use crate::core::control::StepControl;
use std::future::Future;
use std::pin::Pin;

/// A step handler.
///
/// Takes a clone of the run's `ContextData<TData>` and resolves to the
/// control signal for the flow. Handlers:
/// 1. take `.read()`/`.write()` guards to copy state in and out,
/// 2. **drop every guard before awaiting** the gateway or the backend,
/// 3. return `StepControl::Stop` once the attempt has a terminal outcome.
pub type Handler<TData, Err> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = Result<StepControl, Err>> + Send>>
    + Send
    + Sync,
>;

// verge_checkout/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckoutError {
  #[error("Step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("Handler missing for non-optional step: {step_name}")]
  HandlerMissing { step_name: String },

  #[error("Amount {major} {currency} cannot be expressed in minor units")]
  AmountOverflow { major: u64, currency: String },

  #[error("Error in a checkout step handler. Source: {source}")]
  HandlerError {
    #[source]
    source: AnyhowError,
  },

  #[error("Internal checkout error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for CheckoutError {
  fn from(err: AnyhowError) -> Self {
    // Unwrap a CheckoutError that was boxed into anyhow on the way up.
    match err.downcast::<CheckoutError>() {
      Ok(inner) => inner,
      Err(source) => CheckoutError::HandlerError { source },
    }
  }
}

pub type CheckoutResult<T, E = CheckoutError> = std::result::Result<T, E>;

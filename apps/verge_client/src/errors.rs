// verge_client/src/errors.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
  #[error("Configuration Error: {0}")]
  Config(String),

  /// Transport failure or non-success status from the backend.
  #[error("uplink/sync error: {message}")]
  Http { status: Option<u16>, message: String },

  /// The backend answered, but not in the agreed shape.
  #[error("Response contract violated: {0}")]
  Contract(String),
}

impl From<reqwest::Error> for ClientError {
  fn from(err: reqwest::Error) -> Self {
    ClientError::Http {
      status: err.status().map(|s| s.as_u16()),
      message: err.to_string(),
    }
  }
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;

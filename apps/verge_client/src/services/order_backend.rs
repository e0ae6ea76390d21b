// verge_client/src/services/order_backend.rs

//! `OrderBackend` over the festival HTTP API.

use crate::config::AppConfig;
use crate::errors::{ClientError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use verge_checkout::{BackendError, OrderAck, OrderBackend, OrderRequest};

pub const CREATE_ORDER_PATH: &str = "/api/orders/create";
pub const APPLY_ACCOMMODATION_PATH: &str = "/api/accommodation/apply";

/// Error body the backend sends with non-success statuses.
#[derive(Deserialize, Debug)]
struct ErrorBody {
  message: Option<String>,
}

pub struct HttpOrderBackend {
  client: reqwest::Client,
  config: AppConfig,
}

impl HttpOrderBackend {
  pub fn new(config: &AppConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.http_timeout)
      .build()
      .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
    Ok(Self {
      client,
      config: config.clone(),
    })
  }

  fn url_for(&self, request: &OrderRequest) -> String {
    match request {
      OrderRequest::Merch(_) => self.config.endpoint(CREATE_ORDER_PATH),
      OrderRequest::Hostel(_) => self.config.endpoint(APPLY_ACCOMMODATION_PATH),
    }
  }
}

/// Message for a non-success response: the body's `message` if it has one.
pub(crate) fn status_message(status: u16, body: &str) -> String {
  serde_json::from_str::<ErrorBody>(body)
    .ok()
    .and_then(|b| b.message)
    .filter(|m| !m.trim().is_empty())
    .unwrap_or_else(|| format!("HTTP {}", status))
}

#[async_trait]
impl OrderBackend for HttpOrderBackend {
  #[instrument(name = "HttpOrderBackend::create_order", skip_all, fields(payment_id = %request.payment_id(), order_id = %request.client_order_id()))]
  async fn create_order(&self, request: &OrderRequest) -> std::result::Result<OrderAck, BackendError> {
    let url = self.url_for(request);
    info!(%url, "Submitting order to backend.");

    let response = self
      .client
      .post(&url)
      .json(request)
      .send()
      .await
      .map_err(|e| BackendError::Transport(e.to_string()))?;

    let status = response.status();
    debug!(status = status.as_u16(), "Order backend responded.");

    let body = response
      .text()
      .await
      .map_err(|e| BackendError::Transport(e.to_string()))?;

    if !status.is_success() {
      let message = status_message(status.as_u16(), &body);
      warn!(status = status.as_u16(), %message, "Order backend rejected the order.");
      return Err(BackendError::Status {
        status: status.as_u16(),
        message,
      });
    }

    serde_json::from_str::<OrderAck>(&body).map_err(|e| {
      warn!(error = %e, "Order backend returned an unexpected body.");
      BackendError::MalformedResponse(e.to_string())
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn status_message_prefers_body_message() {
    assert_eq!(status_message(400, r#"{"message":"Out of stock"}"#), "Out of stock");
    assert_eq!(status_message(502, "<html>Bad Gateway</html>"), "HTTP 502");
    assert_eq!(status_message(500, r#"{"message":""}"#), "HTTP 500");
    assert_eq!(status_message(404, r#"{"error":"nope"}"#), "HTTP 404");
  }
}

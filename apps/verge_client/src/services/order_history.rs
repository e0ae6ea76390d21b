// verge_client/src/services/order_history.rs

//! Read-only lookups: the user's merch orders and hostel booking.

use crate::config::AppConfig;
use crate::errors::{ClientError, Result};
use crate::services::order_backend::status_message;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Processing,
  Shipped,
  Delivered,
  Cancelled,
  #[serde(other)]
  Other,
}

impl OrderStatus {
  /// Drives the delivered/pending badge.
  pub fn is_delivered(&self) -> bool {
    matches!(self, OrderStatus::Delivered)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderedVariant {
  pub size: Option<String>,
  pub color: Option<String>,
  pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OrderedItem {
  pub name: String,
  pub quantity: u32,
  pub variant: OrderedVariant,
}

impl OrderedItem {
  pub fn line_total(&self) -> u64 {
    self.variant.price.saturating_mul(u64::from(self.quantity))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
  pub order_id: String,
  pub order_status: OrderStatus,
  pub payment_status: String,
  pub items: Vec<OrderedItem>,
  #[serde(default)]
  pub total_amount: Option<u64>,
  #[serde(default)]
  pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
  pub hostel_name: String,
  pub days: u32,
  pub payment_status: String,
  #[serde(default)]
  pub verified: bool,
  #[serde(default)]
  pub allotted_room_number: Option<String>,
  #[serde(default)]
  pub qr_token: Option<String>,
  #[serde(default)]
  pub verified_at: Option<DateTime<Utc>>,
}

impl Booking {
  pub fn is_paid(&self) -> bool {
    self.payment_status.eq_ignore_ascii_case("paid")
  }
}

/// The one response envelope both lookups agree on.
#[derive(Debug, Deserialize)]
struct DataEnvelope<T> {
  data: T,
}

pub struct OrderHistory {
  client: reqwest::Client,
  config: AppConfig,
}

impl OrderHistory {
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

  #[instrument(name = "OrderHistory::my_orders", skip(self))]
  pub async fn my_orders(&self, user_id: &str) -> Result<Vec<OrderSummary>> {
    let url = self.config.endpoint(&format!("/api/orders/my-orders/{}", user_id));
    let orders: Vec<OrderSummary> = self.fetch_data(self.client.get(&url)).await?;
    debug!(count = orders.len(), "Fetched order history.");
    Ok(orders)
  }

  #[instrument(name = "OrderHistory::my_booking", skip(self))]
  pub async fn my_booking(&self, firebase_uid: &str) -> Result<Option<Booking>> {
    let url = self.config.endpoint("/api/accommodation/my");
    let request = self.client.get(&url).query(&[("firebaseUid", firebase_uid)]);
    self.fetch_data(request).await
  }

  /// Sends the request and unwraps `{"data": T}`. Anything else is a contract error.
  async fn fetch_data<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> Result<T> {
    let response = request.send().await?;
    let status = response.status();
    let is_json = response
      .headers()
      .get(reqwest::header::CONTENT_TYPE)
      .and_then(|v| v.to_str().ok())
      .map_or(false, |ct| ct.contains("application/json"));
    let body = response.text().await?;

    if !status.is_success() {
      let message = status_message(status.as_u16(), &body);
      warn!(status = status.as_u16(), %message, "Lookup rejected by backend.");
      return Err(ClientError::Http {
        status: Some(status.as_u16()),
        message,
      });
    }
    if !is_json {
      return Err(ClientError::Contract("expected an application/json response".to_string()));
    }

    serde_json::from_str::<DataEnvelope<T>>(&body)
      .map(|envelope| envelope.data)
      .map_err(|e| ClientError::Contract(format!("expected {{\"data\": ...}}: {}", e)))
  }
}

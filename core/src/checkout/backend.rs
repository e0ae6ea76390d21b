// verge_checkout/src/checkout/backend.rs

//! Order-creation requests and the backend that persists them.

use crate::checkout::draft::{CheckoutKind, ClientOrderId, OrderAck, OrderDraft, PaymentId};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_SIZE: &str = "Free Size";
pub const DEFAULT_COLOR: &str = "Default";
pub const PICKUP_LOCATION: &str = "Main Gate";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemVariant {
  pub size: String,
  pub color: String,
  pub price: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
  pub product_id: String,
  pub name: String,
  pub variant: ItemVariant,
  pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Customer {
  pub name: String,
  pub email: String,
  pub phone: String,
  pub address: String,
  pub city: String,
  pub pincode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingInfo {
  pub pickup_location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MerchOrderRequest {
  pub user_id: String,
  pub items: Vec<OrderItem>,
  pub customer: Customer,
  pub payment_id: PaymentId,
  pub order_id: ClientOrderId,
  pub payment_status: String,
  pub order_status: String,
  pub shipping_info: ShippingInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostelBookingRequest {
  pub user_id: String,
  pub days: u32,
  pub qr_token_hash: ClientOrderId,
  pub hostel_name: String,
  pub payment_id: PaymentId,
}

/// The body of one order-creation call. Serialises to the bare JSON object
/// of its variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OrderRequest {
  Merch(MerchOrderRequest),
  Hostel(HostelBookingRequest),
}

impl OrderRequest {
  pub fn from_draft(draft: &OrderDraft, payment_id: &PaymentId, order_id: &ClientOrderId) -> Self {
    match &draft.kind {
      CheckoutKind::Merch { shipping } => OrderRequest::Merch(MerchOrderRequest {
        user_id: draft.user_id.clone(),
        items: draft
          .cart
          .items()
          .iter()
          .map(|item| {
            let variant = item.variant.as_ref();
            OrderItem {
              product_id: item.product_id.clone(),
              name: item.name.clone(),
              variant: ItemVariant {
                size: variant
                  .and_then(|v| v.size.clone())
                  .unwrap_or_else(|| DEFAULT_SIZE.to_string()),
                color: variant
                  .and_then(|v| v.color.clone())
                  .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
                price: item.unit_price,
              },
              quantity: item.quantity,
            }
          })
          .collect(),
        customer: Customer {
          name: draft.contact.name.clone(),
          email: draft.contact.email.clone(),
          phone: draft.contact.phone.clone(),
          address: shipping.address.clone(),
          city: shipping.city.clone(),
          pincode: shipping.pincode.clone(),
        },
        payment_id: payment_id.clone(),
        order_id: order_id.clone(),
        payment_status: "paid".to_string(),
        order_status: "processing".to_string(),
        shipping_info: ShippingInfo {
          pickup_location: PICKUP_LOCATION.to_string(),
        },
      }),
      CheckoutKind::Hostel { hostel_name, days, .. } => OrderRequest::Hostel(HostelBookingRequest {
        user_id: draft.user_id.clone(),
        days: *days,
        qr_token_hash: order_id.clone(),
        hostel_name: hostel_name.clone(),
        payment_id: payment_id.clone(),
      }),
    }
  }

  pub fn payment_id(&self) -> &PaymentId {
    match self {
      OrderRequest::Merch(r) => &r.payment_id,
      OrderRequest::Hostel(r) => &r.payment_id,
    }
  }

  pub fn client_order_id(&self) -> &ClientOrderId {
    match self {
      OrderRequest::Merch(r) => &r.order_id,
      OrderRequest::Hostel(r) => &r.qr_token_hash,
    }
  }

  /// Σ(price × quantity) over the request's items, in major units.
  pub fn items_subtotal(&self) -> Option<u64> {
    match self {
      OrderRequest::Merch(r) => r.items.iter().try_fold(0u64, |acc, item| {
        acc.checked_add(item.variant.price.checked_mul(u64::from(item.quantity))?)
      }),
      OrderRequest::Hostel(r) => crate::checkout::draft::HOSTEL_PRICE_PER_DAY.checked_mul(u64::from(r.days)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
  #[error("uplink/sync error: {0}")]
  Transport(String),

  #[error("order service responded with HTTP {status}: {message}")]
  Status { status: u16, message: String },

  #[error("malformed order response: {0}")]
  MalformedResponse(String),
}

impl BackendError {
  /// The text shown to the user after a failed reconciliation.
  pub fn user_message(&self) -> String {
    match self {
      BackendError::Status { message, .. } => message.clone(),
      other => other.to_string(),
    }
  }
}

#[async_trait]
pub trait OrderBackend: Send + Sync {
  /// Persists the order. A success carries the server's order identifier.
  async fn create_order(&self, request: &OrderRequest) -> Result<OrderAck, BackendError>;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::checkout::cart::{Cart, LineItem};
  use crate::checkout::draft::{ContactInfo, HostelProfile, ShippingDetails};
  use serde_json::json;

  fn contact() -> ContactInfo {
    ContactInfo {
      name: "Asha".into(),
      email: "asha@example.com".into(),
      phone: "9876543210".into(),
    }
  }

  #[test]
  fn merch_request_serialises_to_order_contract() {
    let mut cart = Cart::new();
    cart.add(LineItem::new("p1", "Tee", 600, 1).with_variant(Some("M"), None));
    let draft = OrderDraft::merch(
      "u1",
      contact(),
      cart,
      ShippingDetails {
        address: "12 Main Rd".into(),
        city: "Pune".into(),
        pincode: "411001".into(),
      },
    );
    let request = OrderRequest::from_draft(&draft, &PaymentId::new("pay_1"), &ClientOrderId::new("ORD-1"));
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(
      body,
      json!({
        "userId": "u1",
        "items": [{
          "productId": "p1",
          "name": "Tee",
          "variant": { "size": "M", "color": "Default", "price": 600 },
          "quantity": 1
        }],
        "customer": {
          "name": "Asha", "email": "asha@example.com", "phone": "9876543210",
          "address": "12 Main Rd", "city": "Pune", "pincode": "411001"
        },
        "paymentId": "pay_1",
        "orderId": "ORD-1",
        "paymentStatus": "paid",
        "orderStatus": "processing",
        "shippingInfo": { "pickupLocation": "Main Gate" }
      })
    );
    assert_eq!(request.items_subtotal(), Some(600));
  }

  #[test]
  fn hostel_request_carries_qr_token_and_payment() {
    let draft = OrderDraft::hostel("u1", contact(), "Boys Hostel", 2, HostelProfile::default());
    let request = OrderRequest::from_draft(&draft, &PaymentId::new("pay_2"), &ClientOrderId::new("u1_5"));
    let body = serde_json::to_value(&request).unwrap();
    assert_eq!(
      body,
      json!({ "userId": "u1", "days": 2, "qrTokenHash": "u1_5", "hostelName": "Boys Hostel", "paymentId": "pay_2" })
    );
    assert_eq!(request.client_order_id().as_str(), "u1_5");
  }

  #[test]
  fn status_error_shows_backend_message() {
    let err = BackendError::Status {
      status: 409,
      message: "Duplicate order".into(),
    };
    assert_eq!(err.user_message(), "Duplicate order");
    assert_eq!(
      BackendError::Transport("connection reset".into()).user_message(),
      "uplink/sync error: connection reset"
    );
  }
}

// verge_checkout/src/checkout/draft.rs

//! The user-entered order draft and the identifiers minted for one checkout.

use crate::checkout::cart::{Cart, LineItem};
use crate::checkout::money::{Amount, Currency};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Flat platform fee added to every non-empty merch cart, in major units.
pub const MERCH_PLATFORM_FEE: u64 = 20;
/// Hostel price per day, in major units.
pub const HOSTEL_PRICE_PER_DAY: u64 = 150;
pub const DEFAULT_HOSTEL_DAYS: u32 = 3;
pub const MAX_HOSTEL_DAYS: u32 = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
  pub name: String,
  pub email: String,
  pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingDetails {
  pub address: String,
  pub city: String,
  pub pincode: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostelProfile {
  pub gender: String,
  pub college_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutKind {
  Merch {
    shipping: ShippingDetails,
  },
  Hostel {
    hostel_name: String,
    days: u32,
    profile: HostelProfile,
  },
}

impl CheckoutKind {
  pub fn label(&self) -> &'static str {
    match self {
      CheckoutKind::Merch { .. } => "merch",
      CheckoutKind::Hostel { .. } => "hostel",
    }
  }
}

/// Everything the user entered before paying. Owned by the session and only
/// mutated by the orchestrator on outcome transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
  pub user_id: String,
  pub contact: ContactInfo,
  pub cart: Cart,
  pub kind: CheckoutKind,
  #[serde(default)]
  pub currency: Currency,
}

impl OrderDraft {
  pub fn merch(user_id: impl Into<String>, contact: ContactInfo, cart: Cart, shipping: ShippingDetails) -> Self {
    Self {
      user_id: user_id.into(),
      contact,
      cart,
      kind: CheckoutKind::Merch { shipping },
      currency: Currency::default(),
    }
  }

  /// A booking is priced as a single line of `days` units at the per-day rate.
  pub fn hostel(
    user_id: impl Into<String>,
    contact: ContactInfo,
    hostel_name: impl Into<String>,
    days: u32,
    profile: HostelProfile,
  ) -> Self {
    let hostel_name = hostel_name.into();
    let mut cart = Cart::new();
    cart.add(hostel_line(&hostel_name, days));
    Self {
      user_id: user_id.into(),
      contact,
      cart,
      kind: CheckoutKind::Hostel {
        hostel_name,
        days,
        profile,
      },
      currency: Currency::default(),
    }
  }

  pub fn with_currency(mut self, currency: Currency) -> Self {
    self.currency = currency;
    self
  }

  /// Changes the booked duration and reprices the booking line. No-op for merch drafts.
  pub fn set_hostel_days(&mut self, new_days: u32) {
    if let CheckoutKind::Hostel { hostel_name, days, .. } = &mut self.kind {
      *days = new_days;
      self.cart.clear();
      self.cart.add(hostel_line(hostel_name, new_days));
    }
  }

  pub fn is_empty(&self) -> bool {
    self.cart.is_empty()
  }

  pub fn subtotal(&self) -> Option<u64> {
    self.cart.subtotal()
  }

  pub fn fee(&self) -> u64 {
    match &self.kind {
      CheckoutKind::Merch { .. } if !self.cart.is_empty() => MERCH_PLATFORM_FEE,
      _ => 0,
    }
  }

  /// Subtotal plus fee in major units, `None` on overflow.
  pub fn total(&self) -> Option<Amount> {
    let major = self.subtotal()?.checked_add(self.fee())?;
    Some(Amount::new(major, self.currency))
  }

  /// Empties the cart and resets the kind-specific details after a confirmed order.
  pub fn clear(&mut self) {
    self.cart.clear();
    match &mut self.kind {
      CheckoutKind::Merch { shipping } => *shipping = ShippingDetails::default(),
      CheckoutKind::Hostel { days, .. } => *days = DEFAULT_HOSTEL_DAYS,
    }
  }

  /// Whether `other` orders the same things for the same user. Contact and
  /// shipping details may differ.
  pub fn same_order(&self, other: &OrderDraft) -> bool {
    let same_kind = match (&self.kind, &other.kind) {
      (CheckoutKind::Merch { .. }, CheckoutKind::Merch { .. }) => true,
      (
        CheckoutKind::Hostel { hostel_name, days, .. },
        CheckoutKind::Hostel {
          hostel_name: other_name,
          days: other_days,
          ..
        },
      ) => hostel_name == other_name && days == other_days,
      _ => false,
    };
    same_kind && self.user_id == other.user_id && self.cart == other.cart && self.currency == other.currency
  }

  /// The text shown by the hosted checkout.
  pub fn description(&self, merchant_name: &str) -> String {
    match &self.kind {
      CheckoutKind::Merch { .. } => format!("{} Official Merchandise", merchant_name),
      CheckoutKind::Hostel { hostel_name, .. } => format!("Accommodation at {}", hostel_name),
    }
  }

  /// The merchant name shown by the hosted checkout.
  pub fn display_merchant(&self, merchant_name: &str) -> String {
    match &self.kind {
      CheckoutKind::Merch { .. } => merchant_name.to_string(),
      CheckoutKind::Hostel { .. } => format!("{} Accommodation", merchant_name),
    }
  }
}

fn hostel_line(hostel_name: &str, days: u32) -> LineItem {
  LineItem::new(
    format!("hostel:{}", hostel_name),
    format!("Accommodation at {}", hostel_name),
    HOSTEL_PRICE_PER_DAY,
    days,
  )
}

/// Opaque identifier returned by the payment gateway.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(String);

impl PaymentId {
  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for PaymentId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for PaymentId {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

/// Client-generated order identifier, sent with the order request so the
/// backend can recognise a retried submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientOrderId(String);

impl ClientOrderId {
  /// `ORD-<millis>` for merch, `<user_id>_<millis>` (the booking's QR token) for hostel.
  pub fn generate(draft: &OrderDraft, unix_millis: i64) -> Self {
    match draft.kind {
      CheckoutKind::Merch { .. } => Self(format!("ORD-{}", unix_millis)),
      CheckoutKind::Hostel { .. } => Self(format!("{}_{}", draft.user_id, unix_millis)),
    }
  }

  pub fn new(id: impl Into<String>) -> Self {
    Self(id.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ClientOrderId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// The client's echo of a persisted order: identifier and status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
  pub order_id: String,
  pub status: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn contact() -> ContactInfo {
    ContactInfo {
      name: "Asha".into(),
      email: "asha@example.com".into(),
      phone: "9876543210".into(),
    }
  }

  #[test]
  fn merch_total_adds_platform_fee_only_when_cart_has_items() {
    let mut draft = OrderDraft::merch("u1", contact(), Cart::new(), ShippingDetails::default());
    assert_eq!(draft.total(), Some(Amount::inr(0)));

    draft.cart.add(LineItem::new("tee", "Tee", 600, 1));
    assert_eq!(draft.fee(), MERCH_PLATFORM_FEE);
    assert_eq!(draft.total(), Some(Amount::inr(620)));
  }

  #[test]
  fn hostel_draft_prices_days_at_daily_rate() {
    let mut draft = OrderDraft::hostel("u1", contact(), "Boys Hostel A", DEFAULT_HOSTEL_DAYS, HostelProfile::default());
    assert_eq!(draft.total(), Some(Amount::inr(450)));
    assert_eq!(draft.fee(), 0);

    draft.set_hostel_days(5);
    assert_eq!(draft.total(), Some(Amount::inr(750)));
    assert_eq!(draft.cart.len(), 1);
  }

  #[test]
  fn same_order_ignores_contact_but_not_items_or_kind() {
    let cart: Cart = vec![LineItem::new("tee", "Tee", 430, 1)].into_iter().collect();
    let merch = OrderDraft::merch("u1", contact(), cart, ShippingDetails::default());
    let hostel = OrderDraft::hostel("u1", contact(), "Boys Hostel A", 3, HostelProfile::default());
    assert_eq!(merch.total(), hostel.total());
    assert!(!merch.same_order(&hostel));

    let mut edited = merch.clone();
    edited.contact.phone = "9123456780".into();
    assert!(merch.same_order(&edited));

    edited.cart.set_quantity("tee", 2);
    assert!(!merch.same_order(&edited));

    let mut longer = hostel.clone();
    longer.set_hostel_days(4);
    assert!(!hostel.same_order(&longer));
  }

  #[test]
  fn clear_resets_kind_details() {
    let shipping = ShippingDetails {
      address: "12 Main Rd".into(),
      city: "Pune".into(),
      pincode: "411001".into(),
    };
    let cart: Cart = vec![LineItem::new("tee", "Tee", 600, 1)].into_iter().collect();
    let mut draft = OrderDraft::merch("u1", contact(), cart, shipping);
    draft.clear();
    assert!(draft.is_empty());
    assert_eq!(draft.kind, CheckoutKind::Merch { shipping: ShippingDetails::default() });
  }

  #[test]
  fn client_order_id_format_depends_on_kind() {
    let merch = OrderDraft::merch("u1", contact(), Cart::new(), ShippingDetails::default());
    let hostel = OrderDraft::hostel("u1", contact(), "Girls Hostel", 2, HostelProfile::default());
    assert_eq!(ClientOrderId::generate(&merch, 1_700_000_000_000).as_str(), "ORD-1700000000000");
    assert_eq!(ClientOrderId::generate(&hostel, 42).as_str(), "u1_42");
  }

  #[test]
  fn gateway_texts_follow_kind() {
    let hostel = OrderDraft::hostel("u1", contact(), "Girls Hostel", 2, HostelProfile::default());
    assert_eq!(hostel.description("VERGE 2026"), "Accommodation at Girls Hostel");
    assert_eq!(hostel.display_merchant("VERGE 2026"), "VERGE 2026 Accommodation");
  }
}

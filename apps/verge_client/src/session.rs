// verge_client/src/session.rs

//! The signed-in user's context: profile plus the merch cart being built.
//! Created at sign-in and passed explicitly; there is no global session.

use crate::config::AppConfig;
use serde::{Deserialize, Serialize};
use tracing::info;
use verge_checkout::{Cart, CheckoutKind, ContactInfo, Currency, HostelProfile, LineItem, OrderDraft, ShippingDetails};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
  pub uid: String,
  pub display_name: String,
  pub email: String,
  #[serde(default)]
  pub phone: Option<String>,
  #[serde(default)]
  pub gender: Option<String>,
  #[serde(default)]
  pub college_name: Option<String>,
}

impl UserProfile {
  pub fn contact(&self) -> ContactInfo {
    ContactInfo {
      name: self.display_name.clone(),
      email: self.email.clone(),
      phone: self.phone.clone().unwrap_or_default(),
    }
  }

  /// Booking needs gender, college and a name on file.
  pub fn is_complete_for_booking(&self) -> bool {
    let present = |v: &Option<String>| v.as_deref().map_or(false, |s| !s.trim().is_empty());
    present(&self.gender) && present(&self.college_name) && !self.display_name.trim().is_empty()
  }
}

#[derive(Debug)]
pub struct Session {
  pub user: UserProfile,
  /// The merch draft; shipping details are filled in at checkout.
  pub cart: OrderDraft,
  /// Currency every draft of this session is priced in.
  pub currency: Currency,
}

impl Session {
  pub fn start(user: UserProfile, config: &AppConfig) -> Self {
    info!(uid = %user.uid, currency = %config.currency, "Session started.");
    let cart = OrderDraft::merch(user.uid.clone(), user.contact(), Cart::new(), ShippingDetails::default())
      .with_currency(config.currency);
    Self {
      user,
      cart,
      currency: config.currency,
    }
  }

  /// Ends the session, discarding the cart. Returns the user that signed out.
  pub fn end(self) -> UserProfile {
    info!(uid = %self.user.uid, items = self.cart.cart.len(), "Session ended.");
    self.user
  }

  pub fn add_to_cart(&mut self, item: LineItem) {
    self.cart.cart.add(item);
  }

  pub fn clear_cart(&mut self) {
    self.cart.clear();
  }

  /// Prepares the cart draft for checkout with the entered shipping details.
  /// Contact fields are refreshed from the profile only where still empty.
  pub fn merch_draft(&mut self, shipping: ShippingDetails) -> &mut OrderDraft {
    let profile_contact = self.user.contact();
    let contact = &mut self.cart.contact;
    for (field, fallback) in [
      (&mut contact.name, profile_contact.name),
      (&mut contact.email, profile_contact.email),
      (&mut contact.phone, profile_contact.phone),
    ] {
      if field.trim().is_empty() {
        *field = fallback;
      }
    }
    self.cart.kind = CheckoutKind::Merch { shipping };
    self.cart.currency = self.currency;
    &mut self.cart
  }

  /// A fresh booking draft prefilled from the profile.
  pub fn hostel_draft(&self, hostel_name: &str, days: u32) -> OrderDraft {
    OrderDraft::hostel(
      self.user.uid.clone(),
      self.user.contact(),
      hostel_name,
      days,
      HostelProfile {
        gender: self.user.gender.clone().unwrap_or_default(),
        college_name: self.user.college_name.clone().unwrap_or_default(),
      },
    )
    .with_currency(self.currency)
  }
}

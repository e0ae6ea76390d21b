// verge_checkout/src/checkout/validation.rs

//! Local checks run before any external call.

use crate::checkout::draft::{CheckoutKind, OrderDraft, MAX_HOSTEL_DAYS};
use crate::checkout::money::Amount;
use serde::Serialize;
use thiserror::Error;

/// A field-level rejection of the draft.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{field}: {reason}")]
pub struct ValidationError {
  pub field: String,
  pub reason: String,
}

impl ValidationError {
  pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      reason: reason.into(),
    }
  }
}

fn require_text(field: &str, value: &str, reason: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::new(field, reason));
  }
  Ok(())
}

fn is_digits(s: &str) -> bool {
  !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
  let phone = phone.trim();
  let digits = phone.strip_prefix('+').unwrap_or(phone);
  if !is_digits(digits) || !(10..=13).contains(&digits.len()) {
    return Err(ValidationError::new("contact.phone", "Please enter a valid phone number."));
  }
  Ok(())
}

/// Rejects a hostel whose name marks it for the other gender.
fn gender_matches_hostel(hostel_name: &str, gender: &str) -> bool {
  let hostel = hostel_name.to_lowercase();
  let gender = gender.trim().to_lowercase();
  !((hostel.contains("girls") && gender == "male") || (hostel.contains("boys") && gender == "female"))
}

/// Checks the draft and returns its total. The first failing rule wins.
pub fn validate_draft(draft: &OrderDraft) -> Result<Amount, ValidationError> {
  let contact = &draft.contact;
  require_text("contact.name", &contact.name, "Name is required.")?;
  require_text("contact.email", &contact.email, "Email is required.")?;
  if !contact.email.contains('@') {
    return Err(ValidationError::new("contact.email", "Email address is not valid."));
  }
  validate_phone(&contact.phone)?;

  match &draft.kind {
    CheckoutKind::Merch { shipping } => {
      require_text("shipping.address", &shipping.address, "Please fill in all shipping details.")?;
      require_text("shipping.city", &shipping.city, "Please fill in all shipping details.")?;
      let pincode = shipping.pincode.trim();
      if !is_digits(pincode) || pincode.len() != 6 {
        return Err(ValidationError::new("shipping.pincode", "Pincode must be 6 digits."));
      }
    }
    CheckoutKind::Hostel {
      hostel_name,
      days,
      profile,
    } => {
      if !(1..=MAX_HOSTEL_DAYS).contains(days) {
        return Err(ValidationError::new(
          "days",
          format!("Stay must be between 1 and {} days.", MAX_HOSTEL_DAYS),
        ));
      }
      require_text("profile.gender", &profile.gender, "Complete your profile before booking.")?;
      require_text("profile.college_name", &profile.college_name, "Complete your profile before booking.")?;
      if !gender_matches_hostel(hostel_name, &profile.gender) {
        return Err(ValidationError::new("hostel_name", "Gender mismatch with selected hostel."));
      }
    }
  }

  if draft.cart.is_empty() {
    return Err(ValidationError::new("cart", "Cart is empty."));
  }
  if let Some(item) = draft.cart.items().iter().find(|item| item.quantity == 0) {
    return Err(ValidationError::new(
      "cart",
      format!("Quantity for '{}' must be at least 1.", item.name),
    ));
  }

  let total = draft
    .total()
    .ok_or_else(|| ValidationError::new("total", "Order total is too large."))?;
  if total.is_zero() {
    return Err(ValidationError::new("total", "Order total must be greater than zero."));
  }
  if total.to_minor().is_err() {
    return Err(ValidationError::new("total", "Order total is too large."));
  }
  Ok(total)
}

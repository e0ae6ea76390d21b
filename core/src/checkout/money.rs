// verge_checkout/src/checkout/money.rs

//! Amounts in whole major units and the exact conversion to the gateway's minor unit.

use crate::error::CheckoutError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Currency {
  #[default]
  #[serde(rename = "INR")]
  Inr,
}

impl Currency {
  /// ISO 4217 code, as the gateway expects it.
  pub fn code(&self) -> &'static str {
    match self {
      Currency::Inr => "INR",
    }
  }

  /// Minor units per major unit (paise per rupee).
  pub fn minor_per_major(&self) -> u64 {
    match self {
      Currency::Inr => 100,
    }
  }

  pub fn symbol(&self) -> &'static str {
    match self {
      Currency::Inr => "₹",
    }
  }
}

impl fmt::Display for Currency {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.code())
  }
}

impl FromStr for Currency {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_uppercase().as_str() {
      "INR" => Ok(Currency::Inr),
      other => Err(format!("unsupported currency '{}'", other)),
    }
  }
}

/// A total in whole major units. Prices in the store are whole rupees, so the
/// backend and the UI see `major`, and only the gateway sees `to_minor()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Amount {
  pub major: u64,
  pub currency: Currency,
}

impl Amount {
  pub fn new(major: u64, currency: Currency) -> Self {
    Self { major, currency }
  }

  pub fn inr(major: u64) -> Self {
    Self::new(major, Currency::Inr)
  }

  pub fn is_zero(&self) -> bool {
    self.major == 0
  }

  /// Exact conversion to the minor unit. Fails instead of wrapping.
  pub fn to_minor(&self) -> Result<u64, CheckoutError> {
    self
      .major
      .checked_mul(self.currency.minor_per_major())
      .ok_or_else(|| CheckoutError::AmountOverflow {
        major: self.major,
        currency: self.currency.code().to_string(),
      })
  }
}

impl fmt::Display for Amount {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.currency.symbol(), self.major)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn inr_converts_to_paise_exactly() {
    assert_eq!(Amount::inr(620).to_minor().unwrap(), 62_000);
    assert_eq!(Amount::inr(1).to_minor().unwrap(), 100);
    assert_eq!(Amount::inr(0).to_minor().unwrap(), 0);
  }

  #[test]
  fn conversion_overflow_is_an_error_not_a_wrap() {
    let err = Amount::inr(u64::MAX / 10).to_minor().unwrap_err();
    assert!(matches!(err, CheckoutError::AmountOverflow { currency, .. } if currency == "INR"));
  }

  #[test]
  fn amounts_are_equal_only_in_value_and_currency() {
    assert_eq!(Amount::inr(620), Amount::new(620, Currency::Inr));
    assert_ne!(Amount::inr(620), Amount::inr(621));
    assert_eq!(Amount::default(), Amount::inr(0));
  }

  #[test]
  fn display_uses_major_units() {
    assert_eq!(Amount::inr(620).to_string(), "₹620");
  }

  #[test]
  fn currency_parses_case_insensitively() {
    assert_eq!("inr".parse::<Currency>(), Ok(Currency::Inr));
    assert!("usd".parse::<Currency>().is_err());
  }
}

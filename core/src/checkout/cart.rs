// verge_checkout/src/checkout/cart.rs

use serde::{Deserialize, Serialize};

/// Size/colour selection of a merch item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
  pub size: Option<String>,
  pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
  pub product_id: String,
  pub name: String,
  /// Whole major units.
  pub unit_price: u64,
  pub quantity: u32,
  pub variant: Option<Variant>,
}

impl LineItem {
  pub fn new(product_id: impl Into<String>, name: impl Into<String>, unit_price: u64, quantity: u32) -> Self {
    Self {
      product_id: product_id.into(),
      name: name.into(),
      unit_price,
      quantity,
      variant: None,
    }
  }

  pub fn with_variant(mut self, size: Option<&str>, color: Option<&str>) -> Self {
    self.variant = Some(Variant {
      size: size.map(str::to_string),
      color: color.map(str::to_string),
    });
    self
  }

  /// `unit_price × quantity`, `None` on overflow.
  pub fn line_total(&self) -> Option<u64> {
    self.unit_price.checked_mul(u64::from(self.quantity))
  }

  fn same_selection(&self, other: &LineItem) -> bool {
    self.product_id == other.product_id && self.variant == other.variant
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
  items: Vec<LineItem>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  /// Adds an item, merging quantities with an existing line for the same
  /// product and variant.
  pub fn add(&mut self, item: LineItem) {
    match self.items.iter_mut().find(|existing| existing.same_selection(&item)) {
      Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity),
      None => self.items.push(item),
    }
  }

  /// Removes every line for `product_id`. Returns whether anything was removed.
  pub fn remove(&mut self, product_id: &str) -> bool {
    let before = self.items.len();
    self.items.retain(|item| item.product_id != product_id);
    self.items.len() != before
  }

  /// Sets the quantity of the first line for `product_id`; zero removes it.
  pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
    if quantity == 0 {
      return self.remove(product_id);
    }
    match self.items.iter_mut().find(|item| item.product_id == product_id) {
      Some(item) => {
        item.quantity = quantity;
        true
      }
      None => false,
    }
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn items(&self) -> &[LineItem] {
    &self.items
  }

  /// Σ(unit price × quantity) in major units, `None` on overflow.
  pub fn subtotal(&self) -> Option<u64> {
    self
      .items
      .iter()
      .try_fold(0u64, |acc, item| acc.checked_add(item.line_total()?))
  }
}

impl FromIterator<LineItem> for Cart {
  fn from_iter<I: IntoIterator<Item = LineItem>>(iter: I) -> Self {
    let mut cart = Cart::new();
    for item in iter {
      cart.add(item);
    }
    cart
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn add_merges_same_product_and_variant() {
    let mut cart = Cart::new();
    cart.add(LineItem::new("tee", "Tee", 600, 1).with_variant(Some("M"), None));
    cart.add(LineItem::new("tee", "Tee", 600, 2).with_variant(Some("M"), None));
    cart.add(LineItem::new("tee", "Tee", 600, 1).with_variant(Some("L"), None));
    assert_eq!(cart.len(), 2);
    assert_eq!(cart.items()[0].quantity, 3);
  }

  #[test]
  fn subtotal_sums_price_times_quantity() {
    let cart: Cart = vec![LineItem::new("tee", "Tee", 600, 2), LineItem::new("cap", "Cap", 250, 1)]
      .into_iter()
      .collect();
    assert_eq!(cart.subtotal(), Some(1450));
  }

  #[test]
  fn subtotal_reports_overflow() {
    let cart: Cart = vec![LineItem::new("gold", "Gold", u64::MAX, 2)].into_iter().collect();
    assert_eq!(cart.subtotal(), None);
  }

  #[test]
  fn set_quantity_zero_removes_line() {
    let mut cart: Cart = vec![LineItem::new("tee", "Tee", 600, 2)].into_iter().collect();
    assert!(cart.set_quantity("tee", 0));
    assert!(cart.is_empty());
    assert!(!cart.set_quantity("tee", 1));
  }
}

// storefront/src/cart.rs

//! Session-scoped shopping cart that produces the body of `POST /create_preference`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{CheckoutItem, CheckoutMetadata, CheckoutRequest, CustomerInfo, Delivery, DeliveryOption};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
  #[error("Tu carrito está vacío")]
  Empty,

  #[error("Por favor, completa todos los campos de envío.")]
  IncompleteDelivery,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
  pub id: String,
  pub name: String,
  pub unit_price: f64,
  pub quantity: i64,
}

impl CartLine {
  pub fn total(&self) -> f64 {
    self.unit_price * self.quantity as f64
  }
}

/// Lines keep the order in which products were first added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  lines: Vec<CartLine>,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn lines(&self) -> &[CartLine] {
    &self.lines
  }

  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Adds one unit of a product, creating its line on first add.
  pub fn add(&mut self, id: &str, name: &str, unit_price: f64) {
    match self.lines.iter_mut().find(|line| line.id == id) {
      Some(line) => line.quantity += 1,
      None => self.lines.push(CartLine {
        id: id.to_string(),
        name: name.to_string(),
        unit_price,
        quantity: 1,
      }),
    }
  }

  /// Moves a line's quantity by `delta`; the line is dropped once it reaches zero.
  pub fn change_quantity(&mut self, id: &str, delta: i64) {
    let Some(line) = self.lines.iter_mut().find(|line| line.id == id) else {
      return;
    };
    line.quantity += delta;
    if line.quantity <= 0 {
      self.remove(id);
    }
  }

  pub fn remove(&mut self, id: &str) {
    self.lines.retain(|line| line.id != id);
  }

  pub fn clear(&mut self) {
    self.lines.clear();
  }

  /// Number of units across all lines.
  pub fn item_count(&self) -> i64 {
    self.lines.iter().map(|line| line.quantity).sum()
  }

  pub fn subtotal(&self) -> f64 {
    self.lines.iter().map(CartLine::total).sum()
  }

  /// Subtotal plus `shipping_fee` when the goods are delivered.
  pub fn total(&self, option: DeliveryOption, shipping_fee: f64) -> f64 {
    match option {
      DeliveryOption::Pickup => self.subtotal(),
      DeliveryOption::HomeDelivery => self.subtotal() + shipping_fee,
    }
  }

  /// Builds the checkout body. The shipping line is added by the server, never here.
  pub fn checkout_request(&self, name: &str, phone: &str, delivery: &Delivery) -> Result<CheckoutRequest, CartError> {
    if self.is_empty() {
      return Err(CartError::Empty);
    }

    let mut metadata = CheckoutMetadata {
      delivery_option: Some(delivery.option().as_str().to_string()),
      ..CheckoutMetadata::default()
    };
    if let Some(address) = delivery.address() {
      let fields = [&address.department, &address.city, &address.address];
      if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(CartError::IncompleteDelivery);
      }
      metadata.department = Some(address.department.clone());
      metadata.city = Some(address.city.clone());
      metadata.address = Some(address.address.clone());
    }

    Ok(CheckoutRequest {
      items: self
        .lines
        .iter()
        .map(|line| CheckoutItem {
          id: Some(line.id.clone()),
          title: Some(line.name.clone()),
          quantity: Some(line.quantity),
          unit_price: Some(line.unit_price),
          currency_id: None,
        })
        .collect(),
      customer: Some(CustomerInfo {
        name: Some(name.to_string()),
        phone: Some(phone.to_string()),
        email: None,
      }),
      metadata: Some(metadata),
    })
  }
}

// storefront/src/models/order.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};

/// Payment state of an order line. The only transition is `Pending -> Approved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
  Pending,
  Approved,
}

/// One cart line to be recorded for a buyer.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
  pub product_id: String,
  pub product_name: String,
  pub quantity: i64,
  pub unit_price: f64,
}

impl NewOrderLine {
  /// Fixed at insert time and never re-derived.
  pub fn total_price(&self) -> f64 {
    self.quantity as f64 * self.unit_price
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i64,
  pub buyer_id: i64,
  pub product_id: String,
  pub product_name: String,
  pub quantity: i64,
  pub unit_price: f64,
  pub total_price: f64,
  pub payment_status: PaymentStatus,
  pub mercado_pago_id: Option<String>,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

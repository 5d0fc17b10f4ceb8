// storefront/src/models/buyer.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use std::fmt;
use std::str::FromStr;

use super::order::Order;

/// How the buyer receives the goods. Stored and exchanged as the shop's Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
pub enum DeliveryOption {
  #[serde(rename = "Retiro en Local")]
  #[sqlx(rename = "Retiro en Local")]
  Pickup,
  #[serde(rename = "Envío a Domicilio")]
  #[sqlx(rename = "Envío a Domicilio")]
  HomeDelivery,
}

impl DeliveryOption {
  pub const PICKUP_LABEL: &'static str = "Retiro en Local";
  pub const HOME_DELIVERY_LABEL: &'static str = "Envío a Domicilio";

  pub fn as_str(&self) -> &'static str {
    match self {
      DeliveryOption::Pickup => Self::PICKUP_LABEL,
      DeliveryOption::HomeDelivery => Self::HOME_DELIVERY_LABEL,
    }
  }
}

impl fmt::Display for DeliveryOption {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for DeliveryOption {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      Self::PICKUP_LABEL => Ok(DeliveryOption::Pickup),
      Self::HOME_DELIVERY_LABEL => Ok(DeliveryOption::HomeDelivery),
      other => Err(format!("Invalid delivery option: {}", other)),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryAddress {
  pub department: String,
  pub city: String,
  pub address: String,
}

/// A delivery choice together with the details it requires.
///
/// Address fields exist only for home delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
  Pickup,
  Home(DeliveryAddress),
}

impl Delivery {
  pub fn option(&self) -> DeliveryOption {
    match self {
      Delivery::Pickup => DeliveryOption::Pickup,
      Delivery::Home(_) => DeliveryOption::HomeDelivery,
    }
  }

  pub fn address(&self) -> Option<&DeliveryAddress> {
    match self {
      Delivery::Pickup => None,
      Delivery::Home(address) => Some(address),
    }
  }
}

/// Buyer data ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBuyer {
  pub name: String,
  pub phone: String,
  pub delivery: Delivery,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Buyer {
  pub id: i64,
  pub name: String,
  pub phone: String,
  pub delivery_option: DeliveryOption,
  pub department: Option<String>,
  pub city: Option<String>,
  pub address: Option<String>,
  pub created_at: NaiveDateTime,
  pub updated_at: NaiveDateTime,
}

/// A buyer with every order line recorded for them; `orders` is empty, never absent.
#[derive(Debug, Clone, Serialize)]
pub struct BuyerWithOrders {
  #[serde(flatten)]
  pub buyer: Buyer,
  pub orders: Vec<Order>,
}

// storefront/src/models/checkout.rs

//! The checkout request as the client sends it, and its validated form.
//!
//! Every field of the wire types is optional so that a missing field is
//! reported with the shop's own validation message instead of a JSON parse
//! error. [`CheckoutRequest::validate`] turns the wire form into a
//! [`ValidatedCheckout`] in which the delivery invariant is carried by
//! [`Delivery`].

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::buyer::{Delivery, DeliveryAddress, DeliveryOption, NewBuyer};
use super::order::NewOrderLine;
use crate::errors::AppError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutRequest {
  #[serde(default)]
  pub items: Vec<CheckoutItem>,
  #[serde(default)]
  pub customer: Option<CustomerInfo>,
  #[serde(default)]
  pub metadata: Option<CheckoutMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutItem {
  #[serde(default, deserialize_with = "string_or_number", skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quantity: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub unit_price: Option<f64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub currency_id: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInfo {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phone: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckoutMetadata {
  #[serde(rename = "deliveryOption", default, skip_serializing_if = "Option::is_none")]
  pub delivery_option: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  /// Free-text note from the buyer, forwarded in the merchant email.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

/// A cart line that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
  pub id: String,
  pub title: String,
  pub quantity: i64,
  pub unit_price: f64,
  pub currency_id: Option<String>,
}

impl LineItem {
  pub fn to_order_line(&self) -> NewOrderLine {
    NewOrderLine {
      product_id: self.id.clone(),
      product_name: self.title.clone(),
      quantity: self.quantity,
      unit_price: self.unit_price,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
  pub name: String,
  pub phone: String,
  pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedCheckout {
  pub items: Vec<LineItem>,
  pub customer: Customer,
  pub delivery: Delivery,
  pub note: Option<String>,
}

impl ValidatedCheckout {
  pub fn new_buyer(&self) -> NewBuyer {
    NewBuyer {
      name: self.customer.name.clone(),
      phone: self.customer.phone.clone(),
      delivery: self.delivery.clone(),
    }
  }
}

impl CheckoutRequest {
  /// Checks every field in the order the client-facing messages are documented.
  pub fn validate(&self) -> Result<ValidatedCheckout, AppError> {
    if self.items.is_empty() {
      return Err(AppError::Validation("No items provided".to_string()));
    }
    let items = self.items.iter().map(CheckoutItem::validate).collect::<Result<Vec<_>, _>>()?;

    let customer = self.customer.clone().unwrap_or_default();
    let (Some(name), Some(phone)) = (non_blank(&customer.name), non_blank(&customer.phone)) else {
      return Err(AppError::Validation("Customer name and phone are required".to_string()));
    };

    let metadata = self.metadata.clone().unwrap_or_default();
    let Some(raw_option) = non_blank(&metadata.delivery_option) else {
      return Err(AppError::Validation("Delivery option is required".to_string()));
    };
    let option: DeliveryOption = raw_option.parse().map_err(AppError::Validation)?;

    let delivery = match option {
      DeliveryOption::Pickup => Delivery::Pickup,
      DeliveryOption::HomeDelivery => {
        match (non_blank(&metadata.department), non_blank(&metadata.city), non_blank(&metadata.address)) {
          (Some(department), Some(city), Some(address)) => Delivery::Home(DeliveryAddress {
            department,
            city,
            address,
          }),
          _ => {
            return Err(AppError::Validation(
              "Department, city, and address are required for delivery".to_string(),
            ))
          }
        }
      }
    };

    Ok(ValidatedCheckout {
      items,
      customer: Customer {
        name,
        phone,
        email: non_blank(&customer.email),
      },
      delivery,
      note: non_blank(&metadata.message),
    })
  }
}

impl CheckoutItem {
  fn validate(&self) -> Result<LineItem, AppError> {
    let invalid = || {
      let rendered = serde_json::to_string(self).unwrap_or_default();
      AppError::Validation(format!("Invalid item data: {}", rendered))
    };
    let id = non_blank(&self.id).ok_or_else(invalid)?;
    let title = non_blank(&self.title).ok_or_else(invalid)?;
    let quantity = self.quantity.filter(|q| *q > 0).ok_or_else(invalid)?;
    let unit_price = self.unit_price.filter(|p| p.is_finite() && *p >= 0.0).ok_or_else(invalid)?;
    Ok(LineItem {
      id,
      title,
      quantity,
      unit_price,
      currency_id: non_blank(&self.currency_id),
    })
  }
}

fn non_blank(value: &Option<String>) -> Option<String> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Accepts an identifier sent either as a JSON string or a JSON number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
  D: Deserializer<'de>,
{
  match Option::<Value>::deserialize(deserializer)? {
    None | Some(Value::Null) => Ok(None),
    Some(Value::String(s)) => Ok(Some(s)),
    Some(Value::Number(n)) => Ok(Some(n.to_string())),
    Some(other) => Err(serde::de::Error::custom(format!("expected a string or number id, got {}", other))),
  }
}

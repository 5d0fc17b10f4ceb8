// storefront/src/models/webhook.rs

use serde::Deserialize;

use super::checkout::string_or_number;

pub const PAYMENT_UPDATED: &str = "payment.updated";

/// Callback body sent by the payment processor.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentNotification {
  #[serde(default)]
  pub action: Option<String>,
  #[serde(default)]
  pub data: Option<NotificationData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationData {
  #[serde(default, deserialize_with = "string_or_number")]
  pub id: Option<String>,
}

impl PaymentNotification {
  pub fn is_payment_update(&self) -> bool {
    self.action.as_deref() == Some(PAYMENT_UPDATED)
  }

  pub fn payment_id(&self) -> Option<&str> {
    self.data.as_ref().and_then(|d| d.id.as_deref())
  }
}

/// Processor payment ids are decimal numbers; anything else never reaches the API.
pub fn is_valid_payment_id(id: &str) -> bool {
  !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())
}

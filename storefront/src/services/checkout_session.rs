// storefront/src/services/checkout_session.rs

//! Turns a validated cart into a processor checkout preference and returns
//! the hosted-checkout URL.

use std::sync::Arc;

use tracing::{info, instrument};

use super::payment::{
  Payer, PayerPhone, PaymentError, PaymentGateway, PreferenceBackUrls, PreferenceItem, PreferenceMetadata,
  PreferenceRequest,
};
use crate::config::PaymentConfig;
use crate::models::{Customer, Delivery, LineItem};

pub const SHIPPING_ITEM_ID: &str = "shipping";
pub const SHIPPING_ITEM_TITLE: &str = "Costo de Envío";

#[derive(Clone)]
pub struct CheckoutSessionBroker {
  gateway: Arc<dyn PaymentGateway>,
  config: PaymentConfig,
}

impl CheckoutSessionBroker {
  pub fn new(gateway: Arc<dyn PaymentGateway>, config: PaymentConfig) -> Self {
    Self { gateway, config }
  }

  /// Submits a preference for `items` and returns the processor's redirect URL.
  /// No retry: a processor failure goes straight back to the caller.
  #[instrument(name = "CheckoutSessionBroker::create_session", skip(self, items, customer, delivery, note))]
  pub async fn create_session(
    &self,
    items: &[LineItem],
    buyer_id: i64,
    customer: &Customer,
    delivery: &Delivery,
    note: Option<&str>,
  ) -> Result<String, PaymentError> {
    let request = self.build_preference(items, buyer_id, customer, delivery, note);
    let preference = self.gateway.create_preference(&request).await?;
    info!(preference_id = %preference.id, "Checkout session ready.");
    Ok(preference.init_point)
  }

  pub fn build_preference(
    &self,
    items: &[LineItem],
    buyer_id: i64,
    customer: &Customer,
    delivery: &Delivery,
    note: Option<&str>,
  ) -> PreferenceRequest {
    let mut lines: Vec<PreferenceItem> = items
      .iter()
      .map(|item| PreferenceItem {
        id: item.id.clone(),
        title: item.title.clone(),
        quantity: item.quantity,
        currency_id: item.currency_id.clone().unwrap_or_else(|| self.config.default_currency.clone()),
        unit_price: item.unit_price,
      })
      .collect();

    if let Delivery::Home(_) = delivery {
      lines.push(PreferenceItem {
        id: SHIPPING_ITEM_ID.to_string(),
        title: SHIPPING_ITEM_TITLE.to_string(),
        quantity: 1,
        currency_id: self.config.default_currency.clone(),
        unit_price: self.config.shipping_fee,
      });
    }

    let phone = match delivery {
      Delivery::Pickup => None,
      Delivery::Home(_) => Some(PayerPhone {
        number: parse_phone_number(&customer.phone),
      }),
    };

    let address = delivery.address();
    let back_urls = &self.config.back_urls;
    PreferenceRequest {
      items: lines,
      payer: Payer {
        name: customer.name.clone(),
        phone,
      },
      back_urls: PreferenceBackUrls {
        success: back_urls.success.clone(),
        failure: back_urls.failure.clone(),
        pending: back_urls.pending.clone(),
      },
      auto_return: "approved".to_string(),
      external_reference: buyer_id.to_string(),
      metadata: PreferenceMetadata {
        buyer_id,
        delivery_option: delivery.option().as_str().to_string(),
        department: address.map(|a| a.department.clone()),
        city: address.map(|a| a.city.clone()),
        address: address.map(|a| a.address.clone()),
        message: note.map(str::to_string),
      },
    }
  }
}

/// Keeps the digits of `raw` and reads them as a number; 0 when there are none
/// or they do not fit.
pub fn parse_phone_number(raw: &str) -> u64 {
  let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
  digits.parse().unwrap_or(0)
}

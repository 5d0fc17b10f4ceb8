// storefront/src/services/payment.rs

//! MercadoPago client: checkout preferences and payment lookups.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::config::PaymentConfig;
use crate::models::checkout::string_or_number;
use crate::models::webhook::is_valid_payment_id;

#[derive(Debug, Error)]
pub enum PaymentError {
  #[error("Payment processor unreachable: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Payment processor returned {status}: {message}")]
  Api { status: StatusCode, message: String },

  #[error("Unexpected payment processor response: {0}")]
  Decode(String),

  #[error("Invalid payment processor request: {0}")]
  InvalidRequest(String),
}

impl PaymentError {
  pub fn status(&self) -> Option<StatusCode> {
    match self {
      PaymentError::Api { status, .. } => Some(*status),
      PaymentError::Transport(e) => e.status(),
      PaymentError::Decode(_) | PaymentError::InvalidRequest(_) => None,
    }
  }
}

/// Body of `POST /checkout/preferences`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceRequest {
  pub items: Vec<PreferenceItem>,
  pub payer: Payer,
  pub back_urls: PreferenceBackUrls,
  pub auto_return: String,
  pub external_reference: String,
  pub metadata: PreferenceMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreferenceItem {
  pub id: String,
  pub title: String,
  pub quantity: i64,
  pub currency_id: String,
  pub unit_price: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Payer {
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub phone: Option<PayerPhone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayerPhone {
  pub number: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceBackUrls {
  pub success: String,
  pub failure: String,
  pub pending: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreferenceMetadata {
  pub buyer_id: i64,
  #[serde(rename = "deliveryOption")]
  pub delivery_option: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub department: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub city: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub address: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Preference {
  pub id: String,
  pub init_point: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Payment {
  #[serde(default, deserialize_with = "string_or_number")]
  pub id: Option<String>,
  pub status: String,
  #[serde(default)]
  pub external_reference: Option<String>,
}

impl Payment {
  pub fn is_approved(&self) -> bool {
    self.status == "approved"
  }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference, PaymentError>;
  async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError>;
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
  #[serde(default)]
  message: Option<String>,
  #[serde(default)]
  error: Option<String>,
}

#[derive(Clone)]
pub struct MercadoPagoClient {
  client: reqwest::Client,
  api_base: String,
  access_token: String,
}

impl MercadoPagoClient {
  pub fn new(config: &PaymentConfig, timeout: Duration) -> Result<Self, PaymentError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      api_base: config.api_base.trim_end_matches('/').to_string(),
      access_token: config.access_token.clone(),
    })
  }

  /// `{api_base}/v1/payments/{id}` with the id kept as a single path segment.
  fn payment_url(&self, payment_id: &str) -> Result<reqwest::Url, PaymentError> {
    if !is_valid_payment_id(payment_id) {
      return Err(PaymentError::InvalidRequest(format!("payment id {payment_id:?} is not numeric")));
    }
    let mut url = reqwest::Url::parse(&self.api_base).map_err(|e| PaymentError::InvalidRequest(e.to_string()))?;
    url
      .path_segments_mut()
      .map_err(|_| PaymentError::InvalidRequest(format!("{} cannot be a base URL", self.api_base)))?
      .pop_if_empty()
      .extend(["v1", "payments", payment_id]);
    Ok(url)
  }

  async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T, PaymentError> {
    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      let message = serde_json::from_str::<ApiErrorBody>(&body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or(body);
      warn!(%status, %message, "MercadoPago API error.");
      return Err(PaymentError::Api { status, message });
    }
    response.json::<T>().await.map_err(|e| PaymentError::Decode(e.to_string()))
  }
}

#[async_trait]
impl PaymentGateway for MercadoPagoClient {
  #[instrument(name = "MercadoPago::create_preference", skip_all, fields(external_reference = %request.external_reference))]
  async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference, PaymentError> {
    let response = self
      .client
      .post(format!("{}/checkout/preferences", self.api_base))
      .bearer_auth(&self.access_token)
      .json(request)
      .send()
      .await?;
    let preference: Preference = Self::decode(response).await?;
    info!(preference_id = %preference.id, "MercadoPago preference created.");
    Ok(preference)
  }

  #[instrument(name = "MercadoPago::get_payment", skip(self))]
  async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
    let url = self.payment_url(payment_id)?;
    let response = self
      .client
      .get(url)
      .bearer_auth(&self.access_token)
      .send()
      .await?;
    Self::decode(response).await
  }
}

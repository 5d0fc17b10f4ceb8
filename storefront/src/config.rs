// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub log_format: LogFormat,

  pub payments: PaymentConfig,
  pub mail: MailConfig,
  pub chat: ChatConfig,

  /// Applied to every outbound HTTP and SMTP call.
  pub outbound_timeout: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

#[derive(Clone)]
pub struct PaymentConfig {
  pub access_token: String,
  pub api_base: String,
  pub back_urls: BackUrls,
  pub default_currency: String,
  pub shipping_fee: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackUrls {
  pub success: String,
  pub failure: String,
  pub pending: String,
}

#[derive(Clone)]
pub struct MailConfig {
  pub smtp_host: String,
  pub smtp_port: u16,
  pub smtp_user: String,
  pub smtp_pass: String,
  pub starttls: bool,
  /// Merchant inbox that receives contact and checkout emails.
  pub notification_email: String,
  pub notify_on_checkout: bool,
}

#[derive(Clone)]
pub struct ChatConfig {
  pub endpoint: String,
  pub phone: String,
  pub api_key: String,
}

// Secrets stay out of Debug output so the config can be logged.
impl std::fmt::Debug for PaymentConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PaymentConfig")
      .field("access_token", &"[REDACTED]")
      .field("api_base", &self.api_base)
      .field("back_urls", &self.back_urls)
      .field("default_currency", &self.default_currency)
      .field("shipping_fee", &self.shipping_fee)
      .finish()
  }
}

impl std::fmt::Debug for MailConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MailConfig")
      .field("smtp_host", &self.smtp_host)
      .field("smtp_port", &self.smtp_port)
      .field("smtp_user", &self.smtp_user)
      .field("smtp_pass", &"[REDACTED]")
      .field("starttls", &self.starttls)
      .field("notification_email", &self.notification_email)
      .field("notify_on_checkout", &self.notify_on_checkout)
      .finish()
  }
}

impl std::fmt::Debug for ChatConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ChatConfig")
      .field("endpoint", &self.endpoint)
      .field("phone", &self.phone)
      .field("api_key", &"[REDACTED]")
      .finish()
  }
}

impl Default for BackUrls {
  fn default() -> Self {
    Self {
      success: "https://raucher-apicultores.com/success".to_string(),
      failure: "https://raucher-apicultores.com/failure".to_string(),
      pending: "https://raucher-apicultores.com/pending".to_string(),
    }
  }
}

pub const DEFAULT_CURRENCY: &str = "ARS";
pub const DEFAULT_SHIPPING_FEE: f64 = 200.0;

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok();
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };
    let get_or = |var_name: &str, default: &str| get_env(var_name).unwrap_or_else(|_| default.to_string());

    let server_host = get_or("SERVER_HOST", "127.0.0.1");
    let server_port = parse_var("SERVER_PORT", &get_or("SERVER_PORT", "3000"))?;
    let database_url = get_or("DATABASE_URL", "sqlite://database.sqlite");
    let log_format = match get_or("LOG_FORMAT", "pretty").to_ascii_lowercase().as_str() {
      "pretty" => LogFormat::Pretty,
      "json" => LogFormat::Json,
      other => return Err(AppError::Config(format!("Invalid LOG_FORMAT: {}", other))),
    };

    let defaults = BackUrls::default();
    let payments = PaymentConfig {
      access_token: get_env("MERCADOPAGO_ACCESS_TOKEN")?,
      api_base: get_or("MERCADOPAGO_API_BASE", "https://api.mercadopago.com"),
      back_urls: BackUrls {
        success: get_or("CHECKOUT_SUCCESS_URL", &defaults.success),
        failure: get_or("CHECKOUT_FAILURE_URL", &defaults.failure),
        pending: get_or("CHECKOUT_PENDING_URL", &defaults.pending),
      },
      default_currency: get_or("DEFAULT_CURRENCY", DEFAULT_CURRENCY),
      shipping_fee: parse_var("SHIPPING_FEE", &get_or("SHIPPING_FEE", "200"))?,
    };
    if !payments.shipping_fee.is_finite() || payments.shipping_fee < 0.0 {
      return Err(AppError::Config("SHIPPING_FEE must be a non-negative number".to_string()));
    }

    let mail = MailConfig {
      smtp_host: get_env("SMTP_HOST")?,
      smtp_port: parse_var("SMTP_PORT", &get_or("SMTP_PORT", "587"))?,
      smtp_user: get_env("SMTP_USER")?,
      smtp_pass: get_env("SMTP_PASS")?,
      starttls: parse_var("SMTP_STARTTLS", &get_or("SMTP_STARTTLS", "true"))?,
      notification_email: get_env("NOTIFICATION_EMAIL")?,
      notify_on_checkout: parse_var("NOTIFY_ON_CHECKOUT", &get_or("NOTIFY_ON_CHECKOUT", "true"))?,
    };

    let chat = ChatConfig {
      endpoint: get_or("CALLMEBOT_URL", "https://api.callmebot.com/whatsapp.php"),
      phone: get_env("CALLMEBOT_PHONE")?,
      api_key: get_env("CALLMEBOT_APIKEY")?,
    };

    let timeout_secs: u64 = parse_var("OUTBOUND_TIMEOUT_SECS", &get_or("OUTBOUND_TIMEOUT_SECS", "10"))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      log_format,
      payments,
      mail,
      chat,
      outbound_timeout: Duration::from_secs(timeout_secs.max(1)),
    })
  }
}

fn parse_var<T>(name: &str, raw: &str) -> Result<T>
where
  T: std::str::FromStr,
  T::Err: std::fmt::Display,
{
  raw
    .trim()
    .parse::<T>()
    .map_err(|e| AppError::Config(format!("Invalid {}: {}", name, e)))
}

// tests/common/mod.rs
#![allow(dead_code, unused_macros)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::StatusCode;
use tracing::Level;

use storefront::config::AppConfig;
use storefront::services::chat::{ChatNotifier, NotifyError};
use storefront::services::mailer::{MailError, MailMessage, Mailer};
use storefront::services::payment::{Payment, PaymentError, PaymentGateway, Preference, PreferenceRequest};
use storefront::state::AppState;
use storefront::store::RecordStore;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub const INIT_POINT: &str = "https://www.mercadopago.com/checkout/v1/redirect?pref_id=TEST-123";

/// Payment processor double: records preferences and serves a configurable payment.
#[derive(Default)]
pub struct FakeGateway {
  pub preferences: Mutex<Vec<PreferenceRequest>>,
  pub payment: Mutex<Option<Payment>>,
  pub payment_lookups: Mutex<Vec<String>>,
  pub fail_preferences: AtomicBool,
}

impl FakeGateway {
  pub fn set_payment(&self, status: &str, external_reference: Option<&str>) {
    *self.payment.lock().unwrap() = Some(Payment {
      id: Some("123456".to_string()),
      status: status.to_string(),
      external_reference: external_reference.map(str::to_string),
    });
  }

  pub fn last_preference(&self) -> Option<PreferenceRequest> {
    self.preferences.lock().unwrap().last().cloned()
  }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
  async fn create_preference(&self, request: &PreferenceRequest) -> Result<Preference, PaymentError> {
    self.preferences.lock().unwrap().push(request.clone());
    if self.fail_preferences.load(Ordering::SeqCst) {
      return Err(PaymentError::Api {
        status: StatusCode::BAD_REQUEST,
        message: "invalid access token".to_string(),
      });
    }
    Ok(Preference {
      id: "TEST-123".to_string(),
      init_point: INIT_POINT.to_string(),
    })
  }

  async fn get_payment(&self, payment_id: &str) -> Result<Payment, PaymentError> {
    self.payment_lookups.lock().unwrap().push(payment_id.to_string());
    self.payment.lock().unwrap().clone().ok_or_else(|| PaymentError::Api {
      status: StatusCode::NOT_FOUND,
      message: "Payment not found".to_string(),
    })
  }
}

#[derive(Default)]
pub struct RecordingMailer {
  pub sent: Mutex<Vec<MailMessage>>,
  pub fail: AtomicBool,
}

#[async_trait]
impl Mailer for RecordingMailer {
  async fn send(&self, message: MailMessage) -> Result<(), MailError> {
    if self.fail.load(Ordering::SeqCst) {
      return Err(MailError::Address {
        address: "owner@example.com".to_string(),
        reason: "relay refused the message".to_string(),
      });
    }
    self.sent.lock().unwrap().push(message);
    Ok(())
  }
}

#[derive(Default)]
pub struct RecordingChat {
  pub sent: Mutex<Vec<String>>,
  pub fail: AtomicBool,
}

#[async_trait]
impl ChatNotifier for RecordingChat {
  async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
    self.sent.lock().unwrap().push(text.to_string());
    if self.fail.load(Ordering::SeqCst) {
      return Err(NotifyError::Rejected {
        status: StatusCode::SERVICE_UNAVAILABLE,
      });
    }
    Ok(())
  }
}

pub fn test_config() -> AppConfig {
  let vars: HashMap<&str, &str> = HashMap::from([
    ("MERCADOPAGO_ACCESS_TOKEN", "TEST-token"),
    ("SMTP_HOST", "smtp.example.com"),
    ("SMTP_USER", "shop@example.com"),
    ("SMTP_PASS", "secret"),
    ("NOTIFICATION_EMAIL", "owner@example.com"),
    ("CALLMEBOT_PHONE", "+59899000000"),
    ("CALLMEBOT_APIKEY", "123456"),
  ]);
  AppConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap()
}

/// Application state over an in-memory store and recording collaborators.
pub struct Harness {
  pub state: AppState,
  pub gateway: Arc<FakeGateway>,
  pub mailer: Arc<RecordingMailer>,
  pub chat: Arc<RecordingChat>,
}

impl Harness {
  pub fn mails(&self) -> Vec<MailMessage> {
    self.mailer.sent.lock().unwrap().clone()
  }

  pub fn chats(&self) -> Vec<String> {
    self.chat.sent.lock().unwrap().clone()
  }
}

pub async fn harness() -> Harness {
  harness_with(test_config()).await
}

pub async fn harness_with(config: AppConfig) -> Harness {
  setup_tracing();
  let store = RecordStore::in_memory().await.unwrap();
  let gateway = Arc::new(FakeGateway::default());
  let mailer = Arc::new(RecordingMailer::default());
  let chat = Arc::new(RecordingChat::default());
  let state = AppState::new(
    store,
    Arc::new(config),
    gateway.clone(),
    mailer.clone(),
    chat.clone(),
  )
  .unwrap();
  Harness {
    state,
    gateway,
    mailer,
    chat,
  }
}

/// Builds the Actix test service for a harness, with the production routes.
macro_rules! test_app {
  ($harness:expr) => {
    actix_web::test::init_service(
      actix_web::App::new()
        .app_data(actix_web::web::Data::new($harness.state.clone()))
        .configure(storefront::web::routes::configure_app_routes),
    )
    .await
  };
}

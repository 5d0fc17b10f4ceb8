// storefront/src/pipelines/contexts.rs

//! Root context data for each pipeline. Handlers receive these wrapped in
//! `apiary_flow::ContextData`.

use crate::models::{Buyer, CheckoutRequest, ContactForm, ContactMessage, Order, PaymentNotification, ValidatedCheckout};
use crate::services::payment::Payment;
use crate::state::AppState;

/// `POST /create_preference`: validate, record the buyer and the cart lines,
/// tell the merchant, open a payment session.
#[derive(Clone)]
pub struct CheckoutCtxData {
  pub app_state: AppState,
  pub request: CheckoutRequest,
  pub checkout: Option<ValidatedCheckout>,
  pub buyer_id: Option<i64>,
  pub order_ids: Vec<i64>,
  pub init_point: Option<String>,
}

impl CheckoutCtxData {
  pub fn new(app_state: AppState, request: CheckoutRequest) -> Self {
    Self {
      app_state,
      request,
      checkout: None,
      buyer_id: None,
      order_ids: Vec::new(),
      init_point: None,
    }
  }
}

/// What the webhook ended up doing; each variant maps to one plain-text reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
  Received,
  NotPaymentUpdate,
  NotApproved,
  Processed,
}

impl WebhookOutcome {
  pub fn reply(&self) -> &'static str {
    match self {
      WebhookOutcome::NotPaymentUpdate => "Not a payment update",
      WebhookOutcome::NotApproved => "Payment not approved",
      WebhookOutcome::Received | WebhookOutcome::Processed => "OK",
    }
  }
}

/// `POST /webhook`: payment status callback from the processor.
#[derive(Clone)]
pub struct WebhookCtxData {
  pub app_state: AppState,
  pub notification: PaymentNotification,
  pub payment: Option<Payment>,
  pub buyer: Option<Buyer>,
  pub orders: Vec<Order>,
  pub approved_rows: u64,
  pub outcome: WebhookOutcome,
}

impl WebhookCtxData {
  pub fn new(app_state: AppState, notification: PaymentNotification) -> Self {
    Self {
      app_state,
      notification,
      payment: None,
      buyer: None,
      orders: Vec::new(),
      approved_rows: 0,
      outcome: WebhookOutcome::Received,
    }
  }
}

/// `POST /contact`: forward a visitor's message to the merchant inbox.
#[derive(Clone)]
pub struct ContactCtxData {
  pub app_state: AppState,
  pub form: ContactForm,
  pub message: Option<ContactMessage>,
  pub delivered: bool,
}

impl ContactCtxData {
  pub fn new(app_state: AppState, form: ContactForm) -> Self {
    Self {
      app_state,
      form,
      message: None,
      delivered: false,
    }
  }
}

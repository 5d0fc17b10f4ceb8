// storefront/src/state.rs

use std::sync::Arc;

use apiary_flow::FlowRegistry;

use crate::config::AppConfig;
use crate::errors::{AppError, Result};
use crate::pipelines;
use crate::services::{ChatNotifier, CheckoutSessionBroker, Mailer, NotificationDispatcher, PaymentGateway};
use crate::store::RecordStore;

#[derive(Clone)]
pub struct AppState {
  pub store: RecordStore,
  pub flows: Arc<FlowRegistry<AppError>>,
  pub config: Arc<AppConfig>,
  pub payments: Arc<dyn PaymentGateway>,
  pub sessions: CheckoutSessionBroker,
  pub notifier: NotificationDispatcher,
}

impl AppState {
  /// Wires the collaborators together and registers every pipeline.
  pub fn new(
    store: RecordStore,
    config: Arc<AppConfig>,
    payments: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    chat: Arc<dyn ChatNotifier>,
  ) -> Result<Self> {
    let flows = Arc::new(FlowRegistry::<AppError>::new());
    pipelines::register_all_pipelines(&flows)?;

    Ok(Self {
      store,
      flows,
      sessions: CheckoutSessionBroker::new(payments.clone(), config.payments.clone()),
      notifier: NotificationDispatcher::new(mailer, chat),
      payments,
      config,
    })
  }
}

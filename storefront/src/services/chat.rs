// storefront/src/services/chat.rs

//! Instant messages to the merchant through CallMeBot's WhatsApp gateway.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::ChatConfig;

#[derive(Debug, Error)]
pub enum NotifyError {
  #[error("Chat gateway unreachable: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("Chat gateway returned {status}")]
  Rejected { status: reqwest::StatusCode },
}

#[async_trait]
pub trait ChatNotifier: Send + Sync {
  async fn send_text(&self, text: &str) -> Result<(), NotifyError>;
}

#[derive(Clone)]
pub struct CallMeBotNotifier {
  client: reqwest::Client,
  endpoint: String,
  phone: String,
  api_key: String,
}

impl CallMeBotNotifier {
  pub fn new(config: &ChatConfig, timeout: Duration) -> Result<Self, NotifyError> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self {
      client,
      endpoint: config.endpoint.clone(),
      phone: config.phone.clone(),
      api_key: config.api_key.clone(),
    })
  }
}

#[async_trait]
impl ChatNotifier for CallMeBotNotifier {
  // The API key travels in the query string; neither the span nor the error carries the URL.
  #[instrument(name = "CallMeBot::send_text", skip_all, fields(chars = text.chars().count()))]
  async fn send_text(&self, text: &str) -> Result<(), NotifyError> {
    let response = self
      .client
      .get(&self.endpoint)
      .query(&[("phone", self.phone.as_str()), ("text", text), ("apikey", self.api_key.as_str())])
      .send()
      .await
      .map_err(|e| NotifyError::Transport(e.without_url()))?;

    let status = response.status();
    if !status.is_success() {
      return Err(NotifyError::Rejected { status });
    }
    info!("Chat message delivered to the gateway.");
    Ok(())
  }
}

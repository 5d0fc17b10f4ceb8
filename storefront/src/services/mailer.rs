// storefront/src/services/mailer.rs

use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument};

use crate::config::MailConfig;

#[derive(Debug, Error)]
pub enum MailError {
  #[error("Invalid mail address '{address}': {reason}")]
  Address { address: String, reason: String },

  #[error("Failed to build message: {0}")]
  Build(#[from] lettre::error::Error),

  #[error("SMTP transport failed: {0}")]
  Transport(#[from] lettre::transport::smtp::Error),
}

/// An email to the merchant. `html` adds an HTML alternative to the text body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
  pub subject: String,
  pub text: String,
  pub html: Option<String>,
  pub reply_to: Option<String>,
}

#[async_trait]
pub trait Mailer: Send + Sync {
  async fn send(&self, message: MailMessage) -> Result<(), MailError>;
}

/// Sends through the configured SMTP relay, from `SMTP_USER` to the notification inbox.
#[derive(Clone)]
pub struct SmtpMailer {
  transport: AsyncSmtpTransport<Tokio1Executor>,
  from: Mailbox,
  to: Mailbox,
}

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
  address.parse().map_err(|e: lettre::address::AddressError| MailError::Address {
    address: address.to_string(),
    reason: e.to_string(),
  })
}

impl SmtpMailer {
  pub fn new(config: &MailConfig, timeout: Duration) -> Result<Self, MailError> {
    let builder = if config.starttls {
      AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
    } else {
      AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.smtp_host)
    };
    let transport = builder
      .port(config.smtp_port)
      .credentials(Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone()))
      .timeout(Some(timeout))
      .build();

    Ok(Self {
      transport,
      from: mailbox(&config.smtp_user)?,
      to: mailbox(&config.notification_email)?,
    })
  }
}

#[async_trait]
impl Mailer for SmtpMailer {
  #[instrument(name = "SmtpMailer::send", skip_all, fields(subject = %message.subject))]
  async fn send(&self, message: MailMessage) -> Result<(), MailError> {
    let mut builder = Message::builder()
      .from(self.from.clone())
      .to(self.to.clone())
      .subject(message.subject);
    if let Some(reply_to) = message.reply_to.as_deref() {
      builder = builder.reply_to(mailbox(reply_to)?);
    }

    let email = match message.html {
      Some(html) => builder.multipart(MultiPart::alternative_plain_html(message.text, html))?,
      None => builder.body(message.text)?,
    };

    let response = self.transport.send(email).await?;
    info!(code = %response.code(), "Email accepted by the SMTP relay.");
    Ok(())
  }
}

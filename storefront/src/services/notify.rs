// storefront/src/services/notify.rs

//! Merchant-facing notifications.
//!
//! Contact messages must reach the merchant, so their failure is returned to
//! the caller. Checkout and sale notifications are best-effort: the pipelines
//! run them as optional steps, which log a failure and carry on.

use std::fmt::Write as _;
use std::sync::Arc;

use tracing::{info, instrument};

use super::chat::{ChatNotifier, NotifyError};
use super::mailer::{MailError, MailMessage, Mailer};
use crate::models::{Buyer, ContactMessage, Customer, DeliveryOption, Order};

pub const CONTACT_SUBJECT: &str = "Nuevo mensaje de contacto - Raucher Apicultores";
const NOT_PROVIDED: &str = "No proporcionado";

#[derive(Clone)]
pub struct NotificationDispatcher {
  mailer: Arc<dyn Mailer>,
  chat: Arc<dyn ChatNotifier>,
}

impl NotificationDispatcher {
  pub fn new(mailer: Arc<dyn Mailer>, chat: Arc<dyn ChatNotifier>) -> Self {
    Self { mailer, chat }
  }

  #[instrument(name = "Notify::contact", skip_all)]
  pub async fn send_contact(&self, contact: &ContactMessage) -> Result<(), MailError> {
    self.mailer.send(compose_contact_email(contact)).await?;
    info!("Contact message forwarded to the merchant.");
    Ok(())
  }

  #[instrument(name = "Notify::checkout_submitted", skip_all)]
  pub async fn notify_checkout_submitted(&self, customer: &Customer, note: Option<&str>) -> Result<(), MailError> {
    self.mailer.send(compose_checkout_email(customer, note)).await
  }

  #[instrument(name = "Notify::sale", skip_all, fields(buyer_id = buyer.id, lines = orders.len()))]
  pub async fn notify_sale(&self, buyer: &Buyer, orders: &[Order]) -> Result<(), NotifyError> {
    self.chat.send_text(&compose_sale_summary(buyer, orders)).await
  }
}

pub fn compose_contact_email(contact: &ContactMessage) -> MailMessage {
  let text = format!(
    "Se ha recibido un nuevo mensaje de contacto.\n\nNombre: {}\nEmail: {}\nMensaje: {}",
    contact.name, contact.email, contact.message
  );
  let html = format!(
    "<h2>Nuevo mensaje de contacto</h2>\n\
     <p><strong>Nombre:</strong> {}</p>\n\
     <p><strong>Email:</strong> {}</p>\n\
     <p><strong>Mensaje:</strong></p>\n\
     <p>{}</p>",
    escape_html(&contact.name),
    escape_html(&contact.email),
    escape_html(&contact.message).replace('\n', "<br>")
  );
  MailMessage {
    subject: CONTACT_SUBJECT.to_string(),
    text,
    html: Some(html),
    reply_to: Some(contact.email.clone()),
  }
}

/// The merchant email sent when a checkout is submitted.
pub fn compose_checkout_email(customer: &Customer, note: Option<&str>) -> MailMessage {
  let text = format!(
    "Se ha recibido un nuevo mensaje de contacto.\n\nNombre: {}\nEmail: {}\nMensaje: {}",
    customer.name,
    customer.email.as_deref().unwrap_or(NOT_PROVIDED),
    note.unwrap_or(NOT_PROVIDED)
  );
  MailMessage {
    subject: CONTACT_SUBJECT.to_string(),
    text,
    html: None,
    reply_to: None,
  }
}

/// Text of the chat message announcing a confirmed sale.
pub fn compose_sale_summary(buyer: &Buyer, orders: &[Order]) -> String {
  let mut message = String::from("Vendiste!!\n\nProductos:\n");
  for order in orders {
    let _ = writeln!(message, "- {} (Cantidad: {})", order.product_name, order.quantity);
  }

  message.push_str("\nDatos del comprador:\n");
  let _ = writeln!(message, "Nombre: {}", buyer.name);
  let _ = writeln!(message, "Celular: {}", buyer.phone);
  if buyer.delivery_option == DeliveryOption::HomeDelivery {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
    let _ = writeln!(message, "Departamento: {}", or_na(&buyer.department));
    let _ = writeln!(message, "Ciudad: {}", or_na(&buyer.city));
    let _ = writeln!(message, "Calle: {}", or_na(&buyer.address));
  }
  message
}

pub fn escape_html(input: &str) -> String {
  let mut out = String::with_capacity(input.len());
  for c in input.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      other => out.push(other),
    }
  }
  out
}

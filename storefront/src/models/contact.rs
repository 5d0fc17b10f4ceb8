// storefront/src/models/contact.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::errors::AppError;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub message: Option<String>,
}

/// A contact message whose fields are present and whose email looks like `local@domain.tld`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactMessage {
  pub name: String,
  pub email: String,
  pub message: String,
}

impl ContactForm {
  pub fn validate(&self) -> Result<ContactMessage, AppError> {
    let field = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);
    let (Some(name), Some(email), Some(message)) = (field(&self.name), field(&self.email), field(&self.message)) else {
      return Err(AppError::Validation("Name, email, and message are required".to_string()));
    };
    if !is_valid_email(&email) {
      return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(ContactMessage { name, email, message })
  }
}

pub fn is_valid_email(email: &str) -> bool {
  EMAIL_PATTERN.is_match(email)
}

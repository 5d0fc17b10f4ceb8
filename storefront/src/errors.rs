// storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

use apiary_flow::FlowError;

use crate::services::chat::NotifyError;
use crate::services::mailer::MailError;
use crate::services::payment::PaymentError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  /// A record store failure; `context` is the message shown to the client.
  #[error("{context}: {source}")]
  Storage {
    context: &'static str,
    #[source]
    source: StoreError,
  },

  #[error("{context}: {source}")]
  Payment {
    context: &'static str,
    #[source]
    source: PaymentError,
  },

  #[error("Email Error: {0}")]
  Mail(#[from] MailError),

  #[error("Chat Notification Error: {0}")]
  Notify(#[from] NotifyError),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Workflow Error: {source}")]
  Workflow {
    #[from]
    source: FlowError,
  },

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl AppError {
  pub fn storage(context: &'static str) -> impl FnOnce(StoreError) -> AppError {
    move |source| AppError::Storage { context, source }
  }

  pub fn payment(context: &'static str) -> impl FnOnce(PaymentError) -> AppError {
    move |source| AppError::Payment { context, source }
  }
}

impl From<StoreError> for AppError {
  fn from(source: StoreError) -> Self {
    AppError::Storage {
      context: "Database operation failed",
      source,
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    tracing::error!(application_error = %self, "Responding with error");
    match self {
      AppError::Validation(m) => HttpResponse::BadRequest().json(json!({"error": m})),
      AppError::NotFound(m) => HttpResponse::NotFound().json(json!({"error": m})),
      AppError::Storage { context, source } => {
        HttpResponse::InternalServerError().json(json!({"error": context, "details": source.to_string()}))
      }
      AppError::Payment { context, source } => {
        HttpResponse::InternalServerError().json(json!({"error": context, "details": source.to_string()}))
      }
      AppError::Mail(_) => HttpResponse::InternalServerError().json(json!({"error": "Error sending email"})),
      AppError::Notify(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Error sending chat notification"}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "details": m}))
      }
      AppError::Workflow { source } => {
        HttpResponse::InternalServerError().json(json!({"error": "Workflow processing error", "details": source.to_string()}))
      }
      AppError::Internal(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "details": m}))
      }
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;

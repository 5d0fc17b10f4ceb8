// storefront/src/web/handlers/webhook_handlers.rs

use actix_web::{web, HttpResponse};
use apiary_flow::ContextData;
use tracing::{error, instrument};

use crate::errors::AppError;
use crate::models::PaymentNotification;
use crate::pipelines::contexts::WebhookCtxData;
use crate::state::AppState;

fn plain_text(mut builder: actix_web::HttpResponseBuilder, body: impl Into<String>) -> HttpResponse {
  builder.content_type("text/plain; charset=utf-8").body(body.into())
}

/// `POST /webhook`. Replies are plain text, as the processor expects.
#[instrument(name = "handler::payment_webhook", skip_all, fields(action = ?payload.action))]
pub async fn payment_webhook_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PaymentNotification>,
) -> HttpResponse {
  let ctx_data = ContextData::new(WebhookCtxData::new(app_state.get_ref().clone(), payload.into_inner()));

  match app_state.flows.run(ctx_data.clone()).await {
    Ok(_) => plain_text(HttpResponse::Ok(), ctx_data.with(|c| c.outcome.reply())),
    Err(AppError::Validation(message)) => plain_text(HttpResponse::BadRequest(), message),
    Err(AppError::NotFound(message)) => plain_text(HttpResponse::NotFound(), message),
    Err(e) => {
      error!(error = %e, "Payment webhook failed.");
      plain_text(HttpResponse::InternalServerError(), "Error")
    }
  }
}

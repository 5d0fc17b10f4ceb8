// storefront/src/web/handlers/contact_handlers.rs

use actix_web::{web, HttpResponse};
use apiary_flow::ContextData;
use serde_json::json;
use tracing::instrument;

use crate::errors::AppError;
use crate::models::ContactForm;
use crate::pipelines::contexts::ContactCtxData;
use crate::state::AppState;

/// `POST /contact`
#[instrument(name = "handler::contact", skip_all)]
pub async fn contact_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<ContactForm>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(ContactCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  app_state.flows.run(ctx_data.clone()).await?;

  if !ctx_data.with(|c| c.delivered) {
    return Err(AppError::Internal("Contact message was not delivered.".to_string()));
  }
  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "message": "Mensaje enviado correctamente"
  })))
}

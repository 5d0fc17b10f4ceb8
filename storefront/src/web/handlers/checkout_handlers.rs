// storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use apiary_flow::{ContextData, PipelineResult};
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::models::CheckoutRequest;
use crate::pipelines::contexts::CheckoutCtxData;
use crate::state::AppState;

/// `POST /create_preference`
#[instrument(name = "handler::create_preference", skip_all, fields(items = payload.items.len()))]
pub async fn create_preference_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
  let ctx_data = ContextData::new(CheckoutCtxData::new(app_state.get_ref().clone(), payload.into_inner()));

  match app_state.flows.run(ctx_data.clone()).await? {
    PipelineResult::Completed => {
      let (buyer_id, init_point) = ctx_data.with(|c| (c.buyer_id, c.init_point.clone()));
      let init_point =
        init_point.ok_or_else(|| AppError::Internal("Checkout finished without a payment session.".to_string()))?;
      info!(buyer_id = ?buyer_id, "Checkout accepted, redirecting to the payment processor.");
      Ok(HttpResponse::Ok().json(json!({ "init_point": init_point })))
    }
    PipelineResult::Stopped => {
      warn!("Checkout pipeline stopped before a payment session was created.");
      Err(AppError::Internal("Checkout was halted.".to_string()))
    }
  }
}

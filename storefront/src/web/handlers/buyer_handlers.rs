// storefront/src/web/handlers/buyer_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, info, instrument};

use crate::state::AppState;

/// `GET /api/buyers`: every buyer, newest first, with their order lines.
#[instrument(name = "handler::list_buyers", skip_all)]
pub async fn list_buyers_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match app_state.store.list_buyers_with_orders().await {
    Ok(buyers) => {
      info!(count = buyers.len(), "Listing buyers.");
      HttpResponse::Ok().json(buyers)
    }
    Err(e) => {
      error!(error = %e, "Error fetching buyers.");
      HttpResponse::InternalServerError().json(json!({
        "error": "Error fetching buyers",
        "message": e.to_string()
      }))
    }
  }
}

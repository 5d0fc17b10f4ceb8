// storefront/src/web/routes.rs

use actix_web::error::InternalError;
use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::warn;

use crate::web::handlers::{buyer_handlers, checkout_handlers, contact_handlers, health_handlers, webhook_handlers};

/// Malformed JSON bodies get the same `{"error": ...}` shape as validation failures.
pub fn json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| {
    let message = err.to_string();
    warn!(error = %message, "Rejecting malformed JSON body.");
    InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "error": message }))).into()
  })
}

/// The processor reads webhook replies as plain text, malformed bodies included.
pub fn webhook_json_config() -> web::JsonConfig {
  web::JsonConfig::default().error_handler(|err, _req| {
    let message = err.to_string();
    warn!(error = %message, "Rejecting malformed webhook body.");
    InternalError::from_response(
      err,
      HttpResponse::BadRequest()
        .content_type("text/plain; charset=utf-8")
        .body(message),
    )
    .into()
  })
}

// Called in `main.rs` (and by the HTTP tests) to configure the Actix app.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(json_config())
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .route(
      "/create_preference",
      web::post().to(checkout_handlers::create_preference_handler),
    )
    .route("/api/buyers", web::get().to(buyer_handlers::list_buyers_handler))
    .route("/contact", web::post().to(contact_handlers::contact_handler))
    .service(
      web::resource("/webhook")
        .app_data(webhook_json_config())
        .route(web::post().to(webhook_handlers::payment_webhook_handler)),
    );
}

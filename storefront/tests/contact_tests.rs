// tests/contact_tests.rs

#[macro_use]
mod common;

use std::sync::atomic::Ordering;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::{json, Value};

use common::harness;

#[actix_rt::test]
async fn valid_message_is_forwarded_to_the_merchant() {
  let h = harness().await;
  let app = test_app!(h);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_json(json!({"name": "Ana", "email": "ana@example.com", "message": "Hola\n¿Tienen miel cremosa?"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"success": true, "message": "Mensaje enviado correctamente"}));

  let mails = h.mails();
  assert_eq!(mails.len(), 1);
  assert_eq!(mails[0].subject, "Nuevo mensaje de contacto - Raucher Apicultores");
  assert_eq!(mails[0].reply_to.as_deref(), Some("ana@example.com"));
  assert!(mails[0].html.as_deref().unwrap().contains("Hola<br>¿Tienen miel cremosa?"));
}

#[actix_rt::test]
async fn malformed_email_is_rejected_without_sending() {
  let h = harness().await;
  let app = test_app!(h);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_json(json!({"name": "Ana", "email": "not-an-email", "message": "Hola"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Invalid email format");
  assert!(h.mails().is_empty());
}

#[actix_rt::test]
async fn missing_fields_are_rejected() {
  let h = harness().await;
  let app = test_app!(h);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_json(json!({"name": "Ana", "email": "ana@example.com"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"], "Name, email, and message are required");
}

#[actix_rt::test]
async fn transport_failure_is_reported() {
  let h = harness().await;
  h.mailer.fail.store(true, Ordering::SeqCst);
  let app = test_app!(h);

  let req = test::TestRequest::post()
    .uri("/contact")
    .set_json(json!({"name": "Ana", "email": "ana@example.com", "message": "Hola"}))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({"error": "Error sending email"}));
}

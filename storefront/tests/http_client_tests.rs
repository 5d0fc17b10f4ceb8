// tests/http_client_tests.rs

mod common;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::test_config;
use storefront::config::{ChatConfig, PaymentConfig};
use storefront::models::{Customer, Delivery, LineItem};
use storefront::services::chat::{CallMeBotNotifier, ChatNotifier, NotifyError};
use storefront::services::payment::{MercadoPagoClient, PaymentError, PaymentGateway};
use storefront::services::CheckoutSessionBroker;

const TIMEOUT: Duration = Duration::from_secs(5);

fn payment_config(server: &MockServer) -> PaymentConfig {
  let mut config = test_config().payments;
  config.api_base = server.uri();
  config
}

fn chat_config(server: &MockServer) -> ChatConfig {
  let mut config = test_config().chat;
  config.endpoint = format!("{}/whatsapp.php", server.uri());
  config
}

#[tokio::test]
async fn preference_is_posted_with_bearer_token() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/checkout/preferences"))
    .and(header("authorization", "Bearer TEST-token"))
    .and(body_partial_json(json!({
      "external_reference": "42",
      "auto_return": "approved",
      "payer": {"name": "Ana"},
      "metadata": {"buyer_id": 42, "deliveryOption": "Retiro en Local"}
    })))
    .respond_with(ResponseTemplate::new(201).set_body_json(json!({
      "id": "pref-1",
      "init_point": "https://mp.example/checkout?pref_id=pref-1",
      "sandbox_init_point": "https://sandbox.mp.example/checkout?pref_id=pref-1"
    })))
    .expect(1)
    .mount(&server)
    .await;

  let config = payment_config(&server);
  let client = MercadoPagoClient::new(&config, TIMEOUT).unwrap();
  let broker = CheckoutSessionBroker::new(std::sync::Arc::new(client), config);
  let items = [LineItem {
    id: "p1".to_string(),
    title: "Honey Jar".to_string(),
    quantity: 2,
    unit_price: 10.0,
    currency_id: None,
  }];
  let customer = Customer {
    name: "Ana".to_string(),
    phone: "099123456".to_string(),
    email: None,
  };

  let url = broker
    .create_session(&items, 42, &customer, &Delivery::Pickup, None)
    .await
    .unwrap();
  assert_eq!(url, "https://mp.example/checkout?pref_id=pref-1");
}

#[tokio::test]
async fn processor_errors_carry_status_and_message() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/payments/77"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({
      "message": "Payment not found",
      "error": "not_found",
      "status": 404
    })))
    .mount(&server)
    .await;

  let client = MercadoPagoClient::new(&payment_config(&server), TIMEOUT).unwrap();
  let err = client.get_payment("77").await.unwrap_err();
  match err {
    PaymentError::Api { status, message } => {
      assert_eq!(status.as_u16(), 404);
      assert_eq!(message, "Payment not found");
    }
    other => panic!("expected an API error, got {other:?}"),
  }
}

#[tokio::test]
async fn payment_lookup_accepts_numeric_ids() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/v1/payments/123456"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "id": 123456,
      "status": "approved",
      "external_reference": "7"
    })))
    .mount(&server)
    .await;

  let client = MercadoPagoClient::new(&payment_config(&server), TIMEOUT).unwrap();
  let payment = client.get_payment("123456").await.unwrap();
  assert_eq!(payment.id.as_deref(), Some("123456"));
  assert!(payment.is_approved());
  assert_eq!(payment.external_reference.as_deref(), Some("7"));
}

#[tokio::test]
async fn payment_lookup_stays_under_the_payments_path() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 1, "status": "approved"})))
    .mount(&server)
    .await;

  let client = MercadoPagoClient::new(&payment_config(&server), TIMEOUT).unwrap();
  for id in ["../users/me", "1?status=approved", "1/refunds", "%2e%2e"] {
    let err = client.get_payment(id).await.unwrap_err();
    assert!(matches!(err, PaymentError::InvalidRequest(_)), "{id:?} gave {err:?}");
  }
  assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn unexpected_success_body_is_a_decode_error() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/checkout/preferences"))
    .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
    .mount(&server)
    .await;

  let config = payment_config(&server);
  let broker = CheckoutSessionBroker::new(
    std::sync::Arc::new(MercadoPagoClient::new(&config, TIMEOUT).unwrap()),
    config,
  );
  let customer = Customer {
    name: "Ana".to_string(),
    phone: "099".to_string(),
    email: None,
  };
  let err = broker
    .create_session(&[], 1, &customer, &Delivery::Pickup, None)
    .await
    .unwrap_err();
  assert!(matches!(err, PaymentError::Decode(_)));
}

#[tokio::test]
async fn chat_message_is_sent_as_query_parameters() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/whatsapp.php"))
    .and(query_param("phone", "+59899000000"))
    .and(query_param("apikey", "123456"))
    .and(query_param("text", "Vendiste!!\n\nProductos:\n"))
    .respond_with(ResponseTemplate::new(200).set_body_string("Message queued"))
    .expect(1)
    .mount(&server)
    .await;

  let notifier = CallMeBotNotifier::new(&chat_config(&server), TIMEOUT).unwrap();
  notifier.send_text("Vendiste!!\n\nProductos:\n").await.unwrap();
}

#[tokio::test]
async fn chat_gateway_rejection_is_an_error() {
  let server = MockServer::start().await;
  Mock::given(method("GET"))
    .and(path("/whatsapp.php"))
    .respond_with(ResponseTemplate::new(503))
    .mount(&server)
    .await;

  let notifier = CallMeBotNotifier::new(&chat_config(&server), TIMEOUT).unwrap();
  let err = notifier.send_text("hola").await.unwrap_err();
  assert!(matches!(err, NotifyError::Rejected { status } if status.as_u16() == 503));
}

// storefront/src/main.rs

use std::sync::Arc;

use actix_web::{web as actix_data, App, HttpServer};
use anyhow::Context;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

use storefront::config::{AppConfig, LogFormat};
use storefront::services::{CallMeBotNotifier, MercadoPagoClient, SmtpMailer};
use storefront::state::AppState;
use storefront::store::RecordStore;
use storefront::web::routes::configure_app_routes;

fn init_tracing(format: LogFormat) {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let builder = tracing_subscriber::fmt()
    .with_env_filter(filter) // RUST_LOG overrides the INFO default
    .with_span_events(FmtSpan::CLOSE);
  match format {
    LogFormat::Json => builder.json().init(),
    LogFormat::Pretty => builder.init(),
  }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
  // Logging needs the configured format, so the config is read first and its
  // error reported once a subscriber exists.
  let loaded = AppConfig::from_env();
  init_tracing(loaded.as_ref().map(|c| c.log_format).unwrap_or(LogFormat::Pretty));
  let app_config = match loaded {
    Ok(cfg) => Arc::new(cfg),
    Err(e) => {
      tracing::error!(error = %e, "Failed to load application configuration.");
      return Err(e).context("configuration error");
    }
  };
  tracing::info!(config = ?app_config, "Starting storefront server...");

  let store = RecordStore::connect(&app_config.database_url)
    .await
    .context("failed to open the database")?;
  for table in store.schema_overview().await.context("failed to read the database schema")? {
    let columns: Vec<_> = table.columns.iter().map(|c| format!("{} {}", c.name, c.data_type)).collect();
    tracing::debug!(table = %table.name, columns = ?columns, "Table ready.");
  }

  let timeout = app_config.outbound_timeout;
  let payments = MercadoPagoClient::new(&app_config.payments, timeout).context("failed to build the payment client")?;
  let mailer = SmtpMailer::new(&app_config.mail, timeout).context("failed to build the SMTP transport")?;
  let chat = CallMeBotNotifier::new(&app_config.chat, timeout).context("failed to build the chat client")?;

  let app_state = AppState::new(
    store,
    app_config.clone(),
    Arc::new(payments),
    Arc::new(mailer),
    Arc::new(chat),
  )
  .context("failed to register pipelines")?;

  let server_address = (app_config.server_host.clone(), app_config.server_port);
  tracing::info!(host = %server_address.0, port = server_address.1, "Binding HTTP server...");

  HttpServer::new(move || {
    App::new()
      .app_data(actix_data::Data::new(app_state.clone()))
      .wrap(tracing_actix_web::TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(server_address)?
  .run()
  .await?;

  Ok(())
}

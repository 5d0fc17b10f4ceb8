// storefront/src/pipelines/mod.rs

//! Registers the storefront's request workflows with the flow registry.

use apiary_flow::FlowRegistry;

use crate::errors::{AppError, Result};

pub mod checkout_pipeline;
pub mod contact_pipeline;
pub mod contexts;
pub mod webhook_pipeline;

/// Called once at startup, from [`crate::state::AppState::new`].
pub fn register_all_pipelines(flows: &FlowRegistry<AppError>) -> Result<()> {
  tracing::info!("Registering pipelines...");

  checkout_pipeline::register_checkout_pipeline(flows)?;
  webhook_pipeline::register_webhook_pipeline(flows)?;
  contact_pipeline::register_contact_pipeline(flows)?;

  tracing::info!("All application pipelines registered.");
  Ok(())
}

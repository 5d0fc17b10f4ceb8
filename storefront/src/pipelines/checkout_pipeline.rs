// storefront/src/pipelines/checkout_pipeline.rs

use std::sync::Arc;

use apiary_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl, SkipCondition};
use futures_util::future::try_join_all;
use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::models::ValidatedCheckout;
use crate::pipelines::contexts::CheckoutCtxData;

fn validated(ctx_data: &ContextData<CheckoutCtxData>) -> Result<ValidatedCheckout> {
  ctx_data
    .with(|c| c.checkout.clone())
    .ok_or_else(|| AppError::Internal("checkout was not validated".to_string()))
}

fn buyer_id(ctx_data: &ContextData<CheckoutCtxData>) -> Result<i64> {
  ctx_data
    .with(|c| c.buyer_id)
    .ok_or_else(|| AppError::Internal("buyer was not recorded".to_string()))
}

pub fn register_checkout_pipeline(flows: &FlowRegistry<AppError>) -> Result<()> {
  let checkout_email_disabled: SkipCondition<CheckoutCtxData> =
    Arc::new(|ctx_data: ContextData<CheckoutCtxData>| !ctx_data.read().app_state.config.mail.notify_on_checkout);

  let mut p = Pipeline::<CheckoutCtxData, AppError>::new(&[
    ("validate_checkout_request", false, None),
    ("persist_buyer", false, None),
    ("persist_order_lines", false, None),
    ("notify_checkout_submitted", true, Some(checkout_email_disabled)),
    ("create_payment_session", false, None),
  ])?;

  // Step 1: every field is checked before anything is written.
  p.on_root("validate_checkout_request", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let checkout = ctx_data.with(|c| c.request.validate())?;
    info!(
      lines = checkout.items.len(),
      delivery_option = %checkout.delivery.option(),
      "Checkout request validated."
    );
    ctx_data.update(|c| c.checkout = Some(checkout));
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 2
  p.on_root("persist_buyer", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let store = ctx_data.with(|c| c.app_state.store.clone());
    let new_buyer = validated(&ctx_data)?.new_buyer();

    let buyer_id = store
      .insert_buyer(&new_buyer)
      .await
      .map_err(AppError::storage("Error saving buyer information"))?;

    info!(buyer_id, "Buyer recorded.");
    ctx_data.update(|c| c.buyer_id = Some(buyer_id));
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 3: lines go in concurrently once the buyer id exists. A failed line
  // leaves the buyer and any sibling rows in place.
  p.on_root("persist_order_lines", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let store = ctx_data.with(|c| c.app_state.store.clone());
    let buyer_id = buyer_id(&ctx_data)?;
    let lines: Vec<_> = validated(&ctx_data)?.items.iter().map(|item| item.to_order_line()).collect();

    let order_ids = try_join_all(lines.iter().map(|line| store.insert_order(buyer_id, line)))
      .await
      .map_err(AppError::storage("Error saving order items"))?;

    info!(buyer_id, orders = order_ids.len(), "Order lines recorded.");
    ctx_data.update(|c| c.order_ids = order_ids);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 4 (optional): failures are logged by the engine and never reach the client.
  p.on_root("notify_checkout_submitted", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let notifier = ctx_data.with(|c| c.app_state.notifier.clone());
    let checkout = validated(&ctx_data)?;

    notifier
      .notify_checkout_submitted(&checkout.customer, checkout.note.as_deref())
      .await?;
    info!("Checkout notification email sent.");
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 5
  p.on_root("create_payment_session", |ctx_data: ContextData<CheckoutCtxData>| async move {
    let sessions = ctx_data.with(|c| c.app_state.sessions.clone());
    let buyer_id = buyer_id(&ctx_data)?;
    let checkout = validated(&ctx_data)?;

    let init_point = sessions
      .create_session(
        &checkout.items,
        buyer_id,
        &checkout.customer,
        &checkout.delivery,
        checkout.note.as_deref(),
      )
      .await
      .map_err(|e| {
        warn!(buyer_id, status = ?e.status(), error = %e, "Payment session could not be created.");
        AppError::payment("Error creating MercadoPago preference")(e)
      })?;

    ctx_data.update(|c| c.init_point = Some(init_point));
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  flows.register(p);
  info!("Checkout pipeline registered.");
  Ok(())
}

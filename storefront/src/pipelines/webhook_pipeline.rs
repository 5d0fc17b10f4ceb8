// storefront/src/pipelines/webhook_pipeline.rs

use apiary_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::{info, warn};

use crate::errors::{AppError, Result};
use crate::models::is_valid_payment_id;
use crate::pipelines::contexts::{WebhookCtxData, WebhookOutcome};

pub fn register_webhook_pipeline(flows: &FlowRegistry<AppError>) -> Result<()> {
  let mut p = Pipeline::<WebhookCtxData, AppError>::new(&[
    ("filter_payment_updates", false, None),
    ("fetch_payment", false, None),
    ("load_buyer_and_orders", false, None),
    ("approve_orders", false, None),
    ("notify_sale", true, None),
  ])?;

  // Step 1: anything other than a payment update is acknowledged and ignored.
  p.on_root("filter_payment_updates", |ctx_data: ContextData<WebhookCtxData>| async move {
    let action = ctx_data.with(|c| c.notification.action.clone());
    if ctx_data.with(|c| c.notification.is_payment_update()) {
      return Ok::<_, AppError>(PipelineControl::Continue);
    }
    info!(action = ?action, "Ignoring webhook that is not a payment update.");
    ctx_data.update(|c| c.outcome = WebhookOutcome::NotPaymentUpdate);
    Ok(PipelineControl::Stop)
  })?;

  // Step 2: the callback only names the payment; its status comes from the processor.
  p.on_root("fetch_payment", |ctx_data: ContextData<WebhookCtxData>| async move {
    let (payments, payment_id) = ctx_data.with(|c| {
      (
        c.app_state.payments.clone(),
        c.notification.payment_id().map(str::to_string),
      )
    });
    let payment_id = payment_id.ok_or_else(|| AppError::Internal("payment update without data.id".to_string()))?;
    if !is_valid_payment_id(&payment_id) {
      warn!(%payment_id, "Rejecting payment update with a non-numeric id.");
      return Err(AppError::Validation("Invalid payment id".to_string()));
    }

    let payment = payments
      .get_payment(&payment_id)
      .await
      .map_err(AppError::payment("Error fetching payment"))?;
    info!(%payment_id, status = %payment.status, "Payment fetched.");

    let approved = payment.is_approved();
    ctx_data.update(|c| c.payment = Some(payment));
    if approved {
      Ok::<_, AppError>(PipelineControl::Continue)
    } else {
      ctx_data.update(|c| c.outcome = WebhookOutcome::NotApproved);
      Ok(PipelineControl::Stop)
    }
  })?;

  // Step 3: the external reference carries the buyer id given at checkout.
  p.on_root("load_buyer_and_orders", |ctx_data: ContextData<WebhookCtxData>| async move {
    let (store, reference) = ctx_data.with(|c| {
      (
        c.app_state.store.clone(),
        c.payment.as_ref().and_then(|p| p.external_reference.clone()),
      )
    });

    let buyer_id = reference.as_deref().and_then(|r| r.trim().parse::<i64>().ok());
    let buyer = match buyer_id {
      Some(id) => store.get_buyer(id).await?,
      None => None,
    };
    let Some(buyer) = buyer else {
      warn!(external_reference = ?reference, "Approved payment does not match any buyer.");
      return Err(AppError::NotFound("Buyer not found".to_string()));
    };

    let orders = store.list_orders(buyer.id).await?;
    ctx_data.update(|c| {
      c.buyer = Some(buyer);
      c.orders = orders;
    });
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 4: every order of the buyer is approved, whichever lines the payment covered.
  p.on_root("approve_orders", |ctx_data: ContextData<WebhookCtxData>| async move {
    let (store, buyer_id) = ctx_data.with(|c| (c.app_state.store.clone(), c.buyer.as_ref().map(|b| b.id)));
    let buyer_id = buyer_id.ok_or_else(|| AppError::Internal("buyer was not loaded".to_string()))?;

    let rows = store.mark_orders_approved(buyer_id).await?;
    info!(buyer_id, rows, "Orders approved.");
    ctx_data.update(|c| {
      c.approved_rows = rows;
      c.outcome = WebhookOutcome::Processed;
    });
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Step 5 (optional): one chat message per approved callback, replays included.
  p.on_root("notify_sale", |ctx_data: ContextData<WebhookCtxData>| async move {
    let (notifier, buyer, orders) = ctx_data.with(|c| (c.app_state.notifier.clone(), c.buyer.clone(), c.orders.clone()));
    let buyer = buyer.ok_or_else(|| AppError::Internal("buyer was not loaded".to_string()))?;

    notifier.notify_sale(&buyer, &orders).await?;
    info!(buyer_id = buyer.id, "Sale notification sent.");
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  flows.register(p);
  info!("Webhook pipeline registered.");
  Ok(())
}

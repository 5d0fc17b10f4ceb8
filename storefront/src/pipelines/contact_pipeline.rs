// storefront/src/pipelines/contact_pipeline.rs

use apiary_flow::{ContextData, FlowRegistry, Pipeline, PipelineControl};
use tracing::info;

use crate::errors::{AppError, Result};
use crate::pipelines::contexts::ContactCtxData;

pub fn register_contact_pipeline(flows: &FlowRegistry<AppError>) -> Result<()> {
  let mut p = Pipeline::<ContactCtxData, AppError>::new(&[
    ("validate_contact_form", false, None),
    ("send_contact_email", false, None),
  ])?;

  p.on_root("validate_contact_form", |ctx_data: ContextData<ContactCtxData>| async move {
    let message = ctx_data.with(|c| c.form.validate())?;
    ctx_data.update(|c| c.message = Some(message));
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  // Unlike checkout emails this one is required: the visitor is told whether it went out.
  p.on_root("send_contact_email", |ctx_data: ContextData<ContactCtxData>| async move {
    let (notifier, message) = ctx_data.with(|c| (c.app_state.notifier.clone(), c.message.clone()));
    let message = message.ok_or_else(|| AppError::Internal("contact form was not validated".to_string()))?;

    notifier.send_contact(&message).await?;
    info!("Contact message delivered.");
    ctx_data.update(|c| c.delivered = true);
    Ok::<_, AppError>(PipelineControl::Continue)
  })?;

  flows.register(p);
  info!("Contact pipeline registered.");
  Ok(())
}

// core/src/core/handler.rs

use super::{ContextData, PipelineControl};
use std::future::Future;
use std::pin::Pin;

/// Boxed future produced by a registered handler.
pub type HandlerFuture<Err> = Pin<Box<dyn Future<Output = Result<PipelineControl, Err>> + Send>>;

/// A type-erased step handler over `ContextData<TData>`.
///
/// Users normally never build one by hand; `Pipeline::on_root` and
/// `Pipeline::after_root` wrap plain async closures or `async fn`s into this shape.
pub type Handler<TData, Err> = Box<dyn Fn(ContextData<TData>) -> HandlerFuture<Err> + Send + Sync>;

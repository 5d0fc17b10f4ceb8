// storefront/src/web/handlers/mod.rs

pub mod buyer_handlers;
pub mod checkout_handlers;
pub mod contact_handlers;
pub mod health_handlers;
pub mod webhook_handlers;

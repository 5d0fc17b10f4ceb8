// storefront/src/lib.rs

//! Backend of the Raucher Apicultores storefront.
//!
//! Checkout requests are validated, recorded as a buyer plus one order row per
//! cart line, announced to the merchant, and exchanged for a MercadoPago
//! checkout URL. Payment callbacks approve the buyer's orders and send the
//! merchant a sale summary over WhatsApp. Each of these request workflows is an
//! `apiary_flow` pipeline registered in [`state::AppState`].

pub mod cart;
pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod store;
pub mod web;

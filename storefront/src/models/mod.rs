// storefront/src/models/mod.rs

//! Records persisted by the store and the request bodies they are built from.

pub mod buyer;
pub mod checkout;
pub mod contact;
pub mod order;
pub mod webhook;

pub use buyer::{Buyer, BuyerWithOrders, Delivery, DeliveryAddress, DeliveryOption, NewBuyer};
pub use checkout::{
  CheckoutItem, CheckoutMetadata, CheckoutRequest, Customer, CustomerInfo, LineItem, ValidatedCheckout,
};
pub use contact::{ContactForm, ContactMessage};
pub use order::{NewOrderLine, Order, PaymentStatus};
pub use webhook::{is_valid_payment_id, PaymentNotification};

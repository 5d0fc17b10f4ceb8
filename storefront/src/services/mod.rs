// storefront/src/services/mod.rs

//! Outbound collaborators: the payment processor, the SMTP relay, the chat
//! notifier, plus the checkout-session broker and the notification dispatcher
//! built on top of them.

pub mod chat;
pub mod checkout_session;
pub mod mailer;
pub mod notify;
pub mod payment;

pub use chat::{CallMeBotNotifier, ChatNotifier, NotifyError};
pub use checkout_session::CheckoutSessionBroker;
pub use mailer::{MailError, MailMessage, Mailer, SmtpMailer};
pub use notify::NotificationDispatcher;
pub use payment::{MercadoPagoClient, Payment, PaymentError, PaymentGateway, Preference, PreferenceRequest};

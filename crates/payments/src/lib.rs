//! Outbound collaborators used during checkout: the payment gateway that
//! confirms a checkout session and the invoicing endpoint notified per order.

pub mod gateway;
pub mod invoice;
pub mod metadata;

pub use gateway::{CheckoutSession, PaymentGateway, PaymentStatus, StripeGateway};
pub use invoice::{DisabledInvoiceNotifier, HttpInvoiceNotifier, InvoiceNotifier};
pub use metadata::{CheckoutMetadata, MetadataError};

pub mod dto;
pub mod notify_service;
pub mod payment_service;

pub use dto::{CreatePaymentRequest, ErrorResponse, PaymentQueryResponse, PaymentResponse};
pub use notify_service::{NotifyOutcome, NotifyService};
pub use payment_service::PaymentService;

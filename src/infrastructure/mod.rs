pub mod adapters;
pub mod config;

pub use adapters::{HttpTransport, JoinPayAdapter, MySqlPaymentRepository};
pub use config::JoinPayConfig;

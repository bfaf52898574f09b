pub mod joinpay_config;

pub use joinpay_config::JoinPayConfig;

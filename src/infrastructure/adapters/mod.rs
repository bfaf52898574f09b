pub mod http_transport;
pub mod joinpay_adapter;
pub mod joinpay_sign;
pub mod mysql_payment_repository;

pub use http_transport::HttpTransport;
pub use joinpay_adapter::JoinPayAdapter;
pub use mysql_payment_repository::MySqlPaymentRepository;

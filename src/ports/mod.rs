pub mod gateway_port;
pub mod payment_repository_port;
pub mod settlement_port;
pub mod transport_port;

pub use gateway_port::GatewayPort;
pub use payment_repository_port::PaymentRepositoryPort;
pub use settlement_port::{SettleOutcome, SettlementPort};
pub use transport_port::TransportPort;

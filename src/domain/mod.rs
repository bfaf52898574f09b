pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::PaymentOrder;
pub use errors::{DomainError, DomainResult};
pub use value_objects::{Money, PaymentState, TradeType};

use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 订单未找到
    #[error("Payment order not found: {0}")]
    OrderNotFound(String),

    /// 订单状态错误
    #[error("Invalid payment state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// 金额无效
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// 支付类型未配置
    #[error("Payment type not configured: {0}")]
    ConfigurationError(String),

    /// 网关明确拒绝请求
    #[error("Gateway rejected: {0}")]
    GatewayRejected(String),

    /// 网关应答报文格式异常
    #[error("Gateway protocol error: {0}")]
    ProtocolError(String),

    /// 网络传输错误（超时、连接失败、非JSON应答）
    #[error("Transport error: {0}")]
    TransportError(String),

    /// 数据库错误
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    /// 序列化错误
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// 领域结果类型
pub type DomainResult<T> = Result<T, DomainError>;

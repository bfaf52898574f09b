use serde::{Deserialize, Serialize};

/// 创建支付请求
#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// 商户订单号
    pub out_order_no: String,

    /// 支付金额（元，十进制字符串）
    pub amount_yuan: String,

    /// 逻辑支付类型标识（注册表键）
    pub payment_type: String,

    /// 支付通道编码
    pub channel_code: String,

    /// 商品名称
    pub title: String,

    /// 商品描述
    pub description: String,

    /// 用户OpenID（公众号/小程序支付时必填）
    pub openid: Option<String>,
}

/// 支付响应
#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    /// 订单ID
    pub order_id: uuid::Uuid,

    /// 商户订单号
    pub out_order_no: String,

    /// 支付金额（分）
    pub amount_cents: i64,

    /// 支付通道组合标识
    pub trade_param: String,

    /// 订单状态
    pub state: String,

    /// 客户端拉起支付所需参数（网关透传）
    pub pay_params: serde_json::Value,
}

/// 订单查询响应
#[derive(Debug, Serialize)]
pub struct PaymentQueryResponse {
    /// 订单ID
    pub order_id: uuid::Uuid,

    /// 商户订单号
    pub out_order_no: String,

    /// 支付金额（分）
    pub amount_cents: i64,

    /// 订单状态
    pub state: String,

    /// 网关银行流水号
    pub bank_trx_no: Option<String>,

    /// 网关侧订单数据（未到终态时查询）
    pub gateway: Option<serde_json::Value>,
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}

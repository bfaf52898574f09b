use crate::domain::errors::DomainResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 网关成功码，下单应答的ra_Code与异步通知的r6_Status共用
pub const GATEWAY_SUCCESS_CODE: i64 = 100;

/// 汇聚下单请求参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderRequest {
    pub out_order_no: String,
    pub amount_cents: i64,
    pub title: String,
    pub description: String,
    pub openid: Option<String>,
    pub payment_type: String,
    pub trade_param: String,
}

/// 汇聚下单应答，rc_Result解析后的客户端支付参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayOrderResponse {
    pub pay_params: serde_json::Value,
}

/// 查询订单应答，网关返回的原始参数集
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayQueryResponse {
    pub raw: serde_json::Value,
}

/// 支付网关端口接口
#[async_trait]
pub trait GatewayPort: Send + Sync {
    /// 创建支付订单
    async fn create_order(&self, request: GatewayOrderRequest)
        -> DomainResult<GatewayOrderResponse>;

    /// 查询订单，纯读操作
    async fn query_order(&self, out_order_no: &str) -> DomainResult<GatewayQueryResponse>;

    /// 验证异步通知签名，参数值须已完成URL解码
    fn verify_notify(&self, fields: &BTreeMap<String, String>) -> bool;
}

use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 汇聚支付配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPayConfig {
    /// 应用编号（q7_AppId）
    pub app_id: String,

    /// 报备商户号（qa_TradeMerchantNo）
    pub trade_merchant_no: String,

    /// 平台商户号（p1_MerchantNo）
    pub merchant_no: String,

    /// 平台商户密钥，报文签名与验签共用
    pub merchant_key: String,

    /// 网关基础URL
    pub base_url: String,

    /// 异步通知回调基础URL（对外可达地址）
    pub notify_base_url: String,
}

impl JoinPayConfig {
    pub fn from_env() -> Arc<Self> {
        Arc::new(Self {
            app_id: std::env::var("JOINPAY_APP_ID")
                .expect("JOINPAY_APP_ID must be set"),
            trade_merchant_no: std::env::var("JOINPAY_TRADE_MERCHANT_NO")
                .expect("JOINPAY_TRADE_MERCHANT_NO must be set"),
            merchant_no: std::env::var("JOINPAY_MERCHANT_NO")
                .expect("JOINPAY_MERCHANT_NO must be set"),
            merchant_key: std::env::var("JOINPAY_MERCHANT_KEY")
                .expect("JOINPAY_MERCHANT_KEY must be set"),
            base_url: std::env::var("JOINPAY_BASE_URL")
                .unwrap_or_else(|_| "https://www.joinpay.com/trade".to_string()),
            notify_base_url: std::env::var("NOTIFY_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
        })
    }
}

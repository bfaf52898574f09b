use crate::domain::errors::{DomainError, DomainResult};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 支付状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentState {
    /// 待支付
    Pending,
    /// 支付成功
    Paid,
    /// 支付失败
    Failed,
}

impl fmt::Display for PaymentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentState::Pending => write!(f, "pending"),
            PaymentState::Paid => write!(f, "paid"),
            PaymentState::Failed => write!(f, "failed"),
        }
    }
}

/// 汇聚支付交易类型，逻辑支付方式到网关FrpCode的静态注册表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeType {
    /// 微信公众号支付
    WechatGzh,
    /// 微信小程序支付
    WechatXcx,
    /// 支付宝扫码支付
    AlipayScan,
}

impl TradeType {
    /// 根据逻辑支付类型标识解析交易类型，未注册的类型返回None
    pub fn resolve(payment_type: &str) -> Option<TradeType> {
        match payment_type {
            "joinpay_gzh" => Some(TradeType::WechatGzh),
            "joinpay_xcx" => Some(TradeType::WechatXcx),
            "joinpay_alipay" => Some(TradeType::AlipayScan),
            _ => None,
        }
    }

    /// 网关侧交易类型编码（q1_FrpCode）
    pub fn frp_code(&self) -> &'static str {
        match self {
            TradeType::WechatGzh => "WEIXIN_GZH",
            TradeType::WechatXcx => "WEIXIN_XCX",
            TradeType::AlipayScan => "ALIPAY_SAOMA",
        }
    }
}

impl fmt::Display for TradeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TradeType::WechatGzh => write!(f, "joinpay_gzh"),
            TradeType::WechatXcx => write!(f, "joinpay_xcx"),
            TradeType::AlipayScan => write!(f, "joinpay_alipay"),
        }
    }
}

/// 支付通道组合标识，拼入回调地址并由通知路由原样带回
pub fn trade_param(payment_type: &str, channel_code: &str) -> String {
    format!("{payment_type}-{channel_code}")
}

/// 货币金额（分为单位，避免浮点数精度问题）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// 金额（分）
    pub amount_cents: i64,
}

impl Money {
    /// 创建新的金额对象（单位：分）
    pub fn from_cents(cents: i64) -> Self {
        Self { amount_cents: cents }
    }

    /// 由元为单位的十进制字符串创建金额对象。
    /// 使用定点十进制换算，拒绝无法精确到分的输入。
    pub fn from_yuan_str(amount: &str) -> DomainResult<Self> {
        let yuan = Decimal::from_str(amount.trim())
            .map_err(|e| DomainError::InvalidAmount(format!("{amount:?}: {e}")))?;
        let cents = yuan * Decimal::ONE_HUNDRED;
        if cents.is_sign_negative() {
            return Err(DomainError::InvalidAmount(format!(
                "{amount:?}: amount must not be negative"
            )));
        }
        if !cents.fract().is_zero() {
            return Err(DomainError::InvalidAmount(format!(
                "{amount:?}: sub-cent precision is not representable"
            )));
        }
        let cents = cents
            .to_i64()
            .ok_or_else(|| DomainError::InvalidAmount(format!("{amount:?}: amount overflow")))?;
        Ok(Self { amount_cents: cents })
    }

    /// 转换为分
    pub fn to_cents(&self) -> i64 {
        self.amount_cents
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "¥{}", Decimal::new(self.amount_cents, 2))
    }
}

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, PaymentState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 支付订单实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    /// 订单ID（内部）
    pub id: Uuid,

    /// 商户订单号
    pub out_order_no: String,

    /// 支付通道组合标识（类型-通道编码）
    pub trade_param: String,

    /// 网关银行流水号（支付后回填）
    pub bank_trx_no: Option<String>,

    /// 下单金额
    pub amount: Money,

    /// 通知确认的实付金额
    pub paid_amount: Option<Money>,

    /// 支付状态
    pub state: PaymentState,

    /// 商品名称
    pub title: String,

    /// 商品描述
    pub description: String,

    /// 用户OpenID（公众号/小程序支付时携带）
    pub openid: Option<String>,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 更新时间
    pub updated_at: DateTime<Utc>,

    /// 支付完成时间
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentOrder {
    /// 创建新的支付订单
    pub fn new(
        out_order_no: String,
        trade_param: String,
        amount: Money,
        title: String,
        description: String,
        openid: Option<String>,
    ) -> DomainResult<Self> {
        // 验证金额
        if amount.to_cents() <= 0 {
            return Err(DomainError::InvalidAmount(
                "Amount must be greater than 0".to_string(),
            ));
        }

        // 验证商户订单号
        if out_order_no.is_empty() || out_order_no.len() > 64 {
            return Err(DomainError::ValidationError(
                "Out order no must be 1-64 characters".to_string(),
            ));
        }

        // 验证商品名称
        if title.is_empty() || title.len() > 127 {
            return Err(DomainError::ValidationError(
                "Title must be 1-127 characters".to_string(),
            ));
        }

        let now = Utc::now();

        Ok(Self {
            id: Uuid::new_v4(),
            out_order_no,
            trade_param,
            bank_trx_no: None,
            amount,
            paid_amount: None,
            state: PaymentState::Pending,
            title,
            description,
            openid,
            created_at: now,
            updated_at: now,
            paid_at: None,
        })
    }

    /// 标记为支付成功，仅允许待支付订单转换一次
    pub fn mark_as_paid(&mut self, bank_trx_no: String, paid_amount: Money) -> DomainResult<()> {
        if self.state != PaymentState::Pending {
            return Err(DomainError::InvalidState {
                expected: PaymentState::Pending.to_string(),
                actual: self.state.to_string(),
            });
        }

        self.state = PaymentState::Paid;
        self.bank_trx_no = Some(bank_trx_no);
        self.paid_amount = Some(paid_amount);
        self.paid_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// 检查是否已到达终态
    pub fn is_finished(&self) -> bool {
        matches!(self.state, PaymentState::Paid | PaymentState::Failed)
    }
}

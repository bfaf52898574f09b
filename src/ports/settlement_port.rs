use crate::domain::errors::DomainResult;
use crate::domain::value_objects::Money;
use async_trait::async_trait;

/// 清算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// 本次调用完成了pending到paid的转换
    Applied,
    /// 订单此前已支付，幂等空操作
    AlreadyApplied,
    /// 订单不存在或不处于可清算状态
    NotFound,
}

/// 清算端口接口。实现必须以原子的检查写入完成状态转换，
/// 并发的重复通知不允许同时观察到pending并重复执行入账副作用。
#[async_trait]
pub trait SettlementPort: Send + Sync {
    /// 将已验证的支付通知落到订单上，pending订单至多转换一次
    async fn apply(
        &self,
        trade_param: &str,
        out_order_no: &str,
        bank_trx_no: &str,
        amount: Money,
    ) -> DomainResult<SettleOutcome>;
}

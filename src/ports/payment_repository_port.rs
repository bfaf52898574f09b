use crate::domain::errors::DomainResult;
use crate::domain::PaymentOrder;
use async_trait::async_trait;

/// 支付订单仓储端口接口
#[async_trait]
pub trait PaymentRepositoryPort: Send + Sync {
    /// 保存支付订单
    async fn save(&self, order: &PaymentOrder) -> DomainResult<()>;

    /// 根据商户订单号查找
    async fn find_by_out_order_no(&self, out_order_no: &str) -> DomainResult<Option<PaymentOrder>>;
}

use crate::domain::value_objects::Money;
use crate::ports::gateway_port::GATEWAY_SUCCESS_CODE;
use crate::ports::GatewayPort;
use crate::ports::{SettleOutcome, SettlementPort};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// 异步通知处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// 通知受理完毕，含幂等空操作与非成功状态的确认
    Accepted,
    /// 签名缺失或验签失败
    RejectedBadSignature,
    /// 清算失败（订单缺失、字段异常、存储故障）
    RejectedApplyFailed,
}

impl NotifyOutcome {
    /// 应答给网关的字面报文，error将触发网关重试投递
    pub fn wire_token(&self) -> &'static str {
        match self {
            NotifyOutcome::Accepted => "success",
            NotifyOutcome::RejectedBadSignature | NotifyOutcome::RejectedApplyFailed => "error",
        }
    }
}

/// 异步通知服务。单次调用内完成验签、状态闸门与清算分发，
/// 自身不持有状态也不重试。
pub struct NotifyService<G: GatewayPort, S: SettlementPort> {
    gateway: Arc<G>,
    settlement: Arc<S>,
}

impl<G: GatewayPort, S: SettlementPort> NotifyService<G, S> {
    pub fn new(gateway: Arc<G>, settlement: Arc<S>) -> Self {
        Self {
            gateway,
            settlement,
        }
    }

    /// 处理支付结果通知
    pub async fn handle(
        &self,
        trade_param: &str,
        params: HashMap<String, String>,
    ) -> NotifyOutcome {
        info!("Handling JoinPay notify for channel: {}", trade_param);

        // 1. 协议规定参数值URL编码传输，验签前逐值解码
        let fields: BTreeMap<String, String> = params
            .into_iter()
            .map(|(key, value)| {
                let decoded = urlencoding::decode(&value).map(|v| v.into_owned()).ok();
                (key, decoded.unwrap_or(value))
            })
            .collect();

        // 2. 验签失败即拒绝，网关会重试投递
        if !self.gateway.verify_notify(&fields) {
            warn!("JoinPay notify rejected: bad signature");
            return NotifyOutcome::RejectedBadSignature;
        }

        // 3. 非支付成功状态仅为过程通报，确认收到即可
        let status = fields
            .get("r6_Status")
            .and_then(|s| s.trim().parse::<i64>().ok());
        if status != Some(GATEWAY_SUCCESS_CODE) {
            info!("JoinPay notify acknowledged with status {:?}", status);
            return NotifyOutcome::Accepted;
        }

        // 4. 支付成功，交由清算端口幂等落账
        let Some(out_order_no) = fields.get("r2_OrderNo") else {
            error!("JoinPay notify missing r2_OrderNo");
            return NotifyOutcome::RejectedApplyFailed;
        };
        let Some(bank_trx_no) = fields.get("r9_BankTrxNo") else {
            error!("JoinPay notify missing r9_BankTrxNo");
            return NotifyOutcome::RejectedApplyFailed;
        };
        let amount = match fields.get("r3_Amount").map(|a| Money::from_yuan_str(a)) {
            Some(Ok(amount)) => amount,
            invalid => {
                error!("JoinPay notify carries invalid r3_Amount: {:?}", invalid);
                return NotifyOutcome::RejectedApplyFailed;
            }
        };

        match self
            .settlement
            .apply(trade_param, out_order_no, bank_trx_no, amount)
            .await
        {
            Ok(SettleOutcome::Applied) => {
                info!("Payment settled via notify: {}", out_order_no);
                NotifyOutcome::Accepted
            }
            Ok(SettleOutcome::AlreadyApplied) => {
                debug!("Notify for settled order ignored: {}", out_order_no);
                NotifyOutcome::Accepted
            }
            Ok(SettleOutcome::NotFound) => {
                error!("Notify settlement target not found: {}", out_order_no);
                NotifyOutcome::RejectedApplyFailed
            }
            Err(e) => {
                error!("Notify settlement failed for {}: {}", out_order_no, e);
                NotifyOutcome::RejectedApplyFailed
            }
        }
    }
}

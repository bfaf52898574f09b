use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Money, PaymentState};
use crate::domain::PaymentOrder;
use crate::ports::payment_repository_port::PaymentRepositoryPort;
use crate::ports::settlement_port::{SettleOutcome, SettlementPort};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::{debug, error, info};

/// MySQL支付订单仓储实现
#[derive(Clone)]
pub struct MySqlPaymentRepository {
    pool: Arc<Pool<MySql>>,
}

impl MySqlPaymentRepository {
    pub fn new(pool: Arc<Pool<MySql>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepositoryPort for MySqlPaymentRepository {
    /// 保存支付订单
    async fn save(&self, order: &PaymentOrder) -> DomainResult<()> {
        let query = r#"
            INSERT INTO payment_orders (
                id, out_order_no, trade_param, bank_trx_no,
                amount_cents, paid_amount_cents, state, title,
                description, openid, created_at, updated_at, paid_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(order.id)
            .bind(&order.out_order_no)
            .bind(&order.trade_param)
            .bind(&order.bank_trx_no)
            .bind(order.amount.to_cents())
            .bind(order.paid_amount.map(|m| m.to_cents()))
            .bind(order.state.to_string())
            .bind(&order.title)
            .bind(&order.description)
            .bind(&order.openid)
            .bind(order.created_at)
            .bind(order.updated_at)
            .bind(order.paid_at)
            .execute(self.pool.as_ref())
            .await?;

        debug!("Payment order saved: {}", order.id);
        Ok(())
    }

    /// 根据商户订单号查找
    async fn find_by_out_order_no(&self, out_order_no: &str) -> DomainResult<Option<PaymentOrder>> {
        let query = r#"
            SELECT id, out_order_no, trade_param, bank_trx_no,
                   amount_cents, paid_amount_cents, state, title,
                   description, openid, created_at, updated_at, paid_at
            FROM payment_orders
            WHERE out_order_no = ?
        "#;

        let result = sqlx::query_as::<_, PaymentOrderRow>(query)
            .bind(out_order_no)
            .fetch_optional(self.pool.as_ref())
            .await?;

        result.map(|row| row.into_order()).transpose()
    }
}

#[async_trait]
impl SettlementPort for MySqlPaymentRepository {
    /// 以条件更新完成pending到paid的原子转换。
    /// 并发的重复通知至多有一条语句命中，其余按既有状态归类。
    async fn apply(
        &self,
        trade_param: &str,
        out_order_no: &str,
        bank_trx_no: &str,
        amount: Money,
    ) -> DomainResult<SettleOutcome> {
        let now = Utc::now();
        let query = r#"
            UPDATE payment_orders
            SET state = 'paid', trade_param = ?, bank_trx_no = ?,
                paid_amount_cents = ?, paid_at = ?, updated_at = ?
            WHERE out_order_no = ? AND state = 'pending'
        "#;

        let rows_affected = sqlx::query(query)
            .bind(trade_param)
            .bind(bank_trx_no)
            .bind(amount.to_cents())
            .bind(now)
            .bind(now)
            .bind(out_order_no)
            .execute(self.pool.as_ref())
            .await?
            .rows_affected();

        if rows_affected > 0 {
            info!("Payment settled: {} via {}", out_order_no, bank_trx_no);
            return Ok(SettleOutcome::Applied);
        }

        match self.find_by_out_order_no(out_order_no).await? {
            Some(order) if order.state == PaymentState::Paid => {
                debug!("Duplicate settlement ignored: {}", out_order_no);
                Ok(SettleOutcome::AlreadyApplied)
            }
            Some(order) => {
                error!(
                    "Settlement refused for {} in state {}",
                    out_order_no, order.state
                );
                Ok(SettleOutcome::NotFound)
            }
            None => {
                error!("Settlement target not found: {}", out_order_no);
                Ok(SettleOutcome::NotFound)
            }
        }
    }
}

/// 数据库行结构体
#[derive(Debug, sqlx::FromRow)]
struct PaymentOrderRow {
    id: uuid::Uuid,
    out_order_no: String,
    trade_param: String,
    bank_trx_no: Option<String>,
    amount_cents: i64,
    paid_amount_cents: Option<i64>,
    state: String,
    title: String,
    description: String,
    openid: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
    paid_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl PaymentOrderRow {
    fn into_order(self) -> DomainResult<PaymentOrder> {
        let state = match self.state.as_str() {
            "pending" => PaymentState::Pending,
            "paid" => PaymentState::Paid,
            "failed" => PaymentState::Failed,
            other => {
                return Err(DomainError::ValidationError(format!(
                    "invalid payment state in storage: {other}"
                )))
            }
        };

        Ok(PaymentOrder {
            id: self.id,
            out_order_no: self.out_order_no,
            trade_param: self.trade_param,
            bank_trx_no: self.bank_trx_no,
            amount: Money::from_cents(self.amount_cents),
            paid_amount: self.paid_amount_cents.map(Money::from_cents),
            state,
            title: self.title,
            description: self.description,
            openid: self.openid,
            created_at: self.created_at,
            updated_at: self.updated_at,
            paid_at: self.paid_at,
        })
    }
}

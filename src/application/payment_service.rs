use crate::application::dto::{CreatePaymentRequest, PaymentQueryResponse, PaymentResponse};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{trade_param, Money};
use crate::domain::PaymentOrder;
use crate::ports::gateway_port::GatewayOrderRequest;
use crate::ports::GatewayPort;
use crate::ports::PaymentRepositoryPort;
use std::sync::Arc;
use tracing::{debug, info};

/// 支付服务
pub struct PaymentService<G: GatewayPort, R: PaymentRepositoryPort> {
    gateway: Arc<G>,
    repository: Arc<R>,
}

impl<G: GatewayPort, R: PaymentRepositoryPort> PaymentService<G, R> {
    pub fn new(gateway: Arc<G>, repository: Arc<R>) -> Self {
        Self {
            gateway,
            repository,
        }
    }

    /// 创建支付订单
    pub async fn create_payment(
        &self,
        request: CreatePaymentRequest,
    ) -> DomainResult<PaymentResponse> {
        info!("Creating payment for order: {}", request.out_order_no);

        // 1. 金额换算与领域校验
        let amount = Money::from_yuan_str(&request.amount_yuan)?;
        let trade_param = trade_param(&request.payment_type, &request.channel_code);
        let order = PaymentOrder::new(
            request.out_order_no.clone(),
            trade_param,
            amount,
            request.title.clone(),
            request.description.clone(),
            request.openid.clone(),
        )?;

        // 2. 调用网关下单
        let gateway_request = GatewayOrderRequest {
            out_order_no: order.out_order_no.clone(),
            amount_cents: order.amount.to_cents(),
            title: order.title.clone(),
            description: order.description.clone(),
            openid: order.openid.clone(),
            payment_type: request.payment_type.clone(),
            trade_param: order.trade_param.clone(),
        };
        let gateway_response = self.gateway.create_order(gateway_request).await?;

        // 3. 网关受理后才落地待支付记录，被拒订单不留本地痕迹
        self.repository.save(&order).await?;
        debug!("Pending record saved: {}", order.id);

        info!("Payment created successfully: {}", order.id);

        Ok(PaymentResponse {
            order_id: order.id,
            out_order_no: order.out_order_no,
            amount_cents: order.amount.to_cents(),
            trade_param: order.trade_param,
            state: order.state.to_string(),
            pay_params: gateway_response.pay_params,
        })
    }

    /// 查询订单。本地记录为准，未到终态时附带网关侧数据，不回写状态。
    pub async fn query_payment(&self, out_order_no: &str) -> DomainResult<PaymentQueryResponse> {
        info!("Querying payment: {}", out_order_no);

        let order = self
            .repository
            .find_by_out_order_no(out_order_no)
            .await?
            .ok_or_else(|| DomainError::OrderNotFound(out_order_no.to_string()))?;

        let gateway = if order.is_finished() {
            None
        } else {
            debug!("Order not finished, querying gateway: {}", out_order_no);
            Some(self.gateway.query_order(out_order_no).await?.raw)
        };

        Ok(PaymentQueryResponse {
            order_id: order.id,
            out_order_no: order.out_order_no,
            amount_cents: order.amount.to_cents(),
            state: order.state.to_string(),
            bank_trx_no: order.bank_trx_no,
            gateway,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use crate::ports::gateway_port::{
        GatewayOrderResponse, GatewayPort, GatewayQueryResponse,
    };
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    struct MockGateway {
        reject_with: Option<String>,
        create_calls: Mutex<Vec<GatewayOrderRequest>>,
    }

    impl MockGateway {
        fn accepting() -> Self {
            Self {
                reject_with: None,
                create_calls: Mutex::new(Vec::new()),
            }
        }

        fn rejecting(message: &str) -> Self {
            Self {
                reject_with: Some(message.to_string()),
                create_calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl GatewayPort for MockGateway {
        async fn create_order(
            &self,
            request: GatewayOrderRequest,
        ) -> DomainResult<GatewayOrderResponse> {
            self.create_calls.lock().unwrap().push(request);
            match &self.reject_with {
                Some(message) => Err(DomainError::GatewayRejected(message.clone())),
                None => Ok(GatewayOrderResponse {
                    pay_params: json!({"r1_MerchantNo": "888000000001"}),
                }),
            }
        }

        async fn query_order(&self, out_order_no: &str) -> DomainResult<GatewayQueryResponse> {
            Ok(GatewayQueryResponse {
                raw: json!({"r2_OrderNo": out_order_no}),
            })
        }

        fn verify_notify(&self, _fields: &BTreeMap<String, String>) -> bool {
            true
        }
    }

    #[derive(Default)]
    struct MockRepository {
        orders: Mutex<Vec<PaymentOrder>>,
    }

    #[async_trait]
    impl PaymentRepositoryPort for MockRepository {
        async fn save(&self, order: &PaymentOrder) -> DomainResult<()> {
            self.orders.lock().unwrap().push(order.clone());
            Ok(())
        }

        async fn find_by_out_order_no(
            &self,
            out_order_no: &str,
        ) -> DomainResult<Option<PaymentOrder>> {
            Ok(self
                .orders
                .lock()
                .unwrap()
                .iter()
                .find(|o| o.out_order_no == out_order_no)
                .cloned())
        }
    }

    fn create_request() -> CreatePaymentRequest {
        CreatePaymentRequest {
            out_order_no: "T1".to_string(),
            amount_yuan: "10.00".to_string(),
            payment_type: "joinpay_xcx".to_string(),
            channel_code: "CH001".to_string(),
            title: "X".to_string(),
            description: "test order".to_string(),
            openid: Some("openid123".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_payment_saves_pending_record_once() {
        let gateway = Arc::new(MockGateway::accepting());
        let repository = Arc::new(MockRepository::default());
        let service = PaymentService::new(gateway.clone(), repository.clone());

        let response = service.create_payment(create_request()).await.unwrap();

        assert_eq!(response.amount_cents, 1000);
        assert_eq!(response.state, "pending");
        assert_eq!(response.trade_param, "joinpay_xcx-CH001");
        assert_eq!(response.pay_params["r1_MerchantNo"], "888000000001");

        let calls = gateway.create_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].amount_cents, 1000);

        assert_eq!(repository.orders.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_payment_rejection_leaves_no_record() {
        let gateway = Arc::new(MockGateway::rejecting("insufficient config"));
        let repository = Arc::new(MockRepository::default());
        let service = PaymentService::new(gateway, repository.clone());

        let error = service.create_payment(create_request()).await.unwrap_err();

        match error {
            DomainError::GatewayRejected(message) => assert_eq!(message, "insufficient config"),
            other => panic!("expected GatewayRejected, got {other:?}"),
        }
        assert!(repository.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_payment_invalid_amount_skips_gateway() {
        let gateway = Arc::new(MockGateway::accepting());
        let repository = Arc::new(MockRepository::default());
        let service = PaymentService::new(gateway.clone(), repository.clone());

        let mut request = create_request();
        request.amount_yuan = "1.005".to_string();
        let error = service.create_payment(request).await.unwrap_err();

        assert!(matches!(error, DomainError::InvalidAmount(_)));
        assert!(gateway.create_calls.lock().unwrap().is_empty());
        assert!(repository.orders.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_query_payment_includes_gateway_view_for_pending() {
        let gateway = Arc::new(MockGateway::accepting());
        let repository = Arc::new(MockRepository::default());
        let service = PaymentService::new(gateway, repository.clone());

        service.create_payment(create_request()).await.unwrap();
        let response = service.query_payment("T1").await.unwrap();

        assert_eq!(response.state, "pending");
        assert_eq!(response.gateway.unwrap()["r2_OrderNo"], "T1");
    }

    #[tokio::test]
    async fn test_query_payment_unknown_order() {
        let gateway = Arc::new(MockGateway::accepting());
        let repository = Arc::new(MockRepository::default());
        let service = PaymentService::new(gateway, repository);

        let error = service.query_payment("missing").await.unwrap_err();

        assert!(matches!(error, DomainError::OrderNotFound(_)));
    }
}

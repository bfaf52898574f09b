use crate::application::{ErrorResponse, NotifyService, PaymentService};
use crate::domain::errors::DomainError;
use crate::ports::{GatewayPort, PaymentRepositoryPort, SettlementPort};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

/// 应用状态
pub struct AppState<G: GatewayPort, R: PaymentRepositoryPort, S: SettlementPort> {
    pub payment_service: Arc<PaymentService<G, R>>,
    pub notify_service: Arc<NotifyService<G, S>>,
}

impl<G: GatewayPort, R: PaymentRepositoryPort, S: SettlementPort> Clone for AppState<G, R, S> {
    fn clone(&self) -> Self {
        Self {
            payment_service: self.payment_service.clone(),
            notify_service: self.notify_service.clone(),
        }
    }
}

/// 创建支付订单
pub async fn create_payment<G: GatewayPort, R: PaymentRepositoryPort, S: SettlementPort>(
    State(state): State<AppState<G, R, S>>,
    Json(request): Json<crate::application::CreatePaymentRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    info!("Received payment creation request: {}", request.out_order_no);

    state
        .payment_service
        .create_payment(request)
        .await
        .map(|response| (StatusCode::CREATED, Json(response)).into_response())
        .map_err(|e| {
            error!("Payment creation error: {}", e);
            let status = match e {
                DomainError::ValidationError(_)
                | DomainError::InvalidAmount(_)
                | DomainError::ConfigurationError(_) => StatusCode::BAD_REQUEST,
                DomainError::GatewayRejected(_)
                | DomainError::ProtocolError(_)
                | DomainError::TransportError(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse::new(
                    "PAYMENT_ERROR".to_string(),
                    e.to_string(),
                )),
            )
        })
}

/// 查询订单
pub async fn query_payment<G: GatewayPort, R: PaymentRepositoryPort, S: SettlementPort>(
    State(state): State<AppState<G, R, S>>,
    Path(out_order_no): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    info!("Received payment query request: {}", out_order_no);

    state
        .payment_service
        .query_payment(&out_order_no)
        .await
        .map(|response| (StatusCode::OK, Json(response)).into_response())
        .map_err(|e| {
            error!("Payment query error: {}", e);
            let status = match e {
                DomainError::OrderNotFound(_) => StatusCode::NOT_FOUND,
                DomainError::GatewayRejected(_)
                | DomainError::ProtocolError(_)
                | DomainError::TransportError(_) => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (
                status,
                Json(ErrorResponse::new(
                    "QUERY_ERROR".to_string(),
                    e.to_string(),
                )),
            )
        })
}

/// 汇聚支付异步通知。应答体为success/error字面报文，
/// 始终返回200，重试语义由报文承载。
pub async fn joinpay_notify<G: GatewayPort, R: PaymentRepositoryPort, S: SettlementPort>(
    State(state): State<AppState<G, R, S>>,
    Path(trade_param): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    info!("Received JoinPay notify for channel: {}", trade_param);

    let outcome = state.notify_service.handle(&trade_param, params).await;
    (StatusCode::OK, outcome.wire_token())
}

/// 健康检查
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" })))
}

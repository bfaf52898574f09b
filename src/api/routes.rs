use super::handlers::*;
use crate::ports::{GatewayPort, PaymentRepositoryPort, SettlementPort};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub fn create_router<G, R, S>(state: AppState<G, R, S>) -> Router
where
    G: GatewayPort + 'static,
    R: PaymentRepositoryPort + 'static,
    S: SettlementPort + 'static,
{
    Router::new()
        .route("/health", get(health_check))
        .route("/api/payments", post(create_payment))
        .route("/api/payments/:out_order_no", get(query_payment))
        .route("/api/notify/joinpay/:trade_param", get(joinpay_notify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

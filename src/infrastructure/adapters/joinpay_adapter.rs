use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::TradeType;
use crate::infrastructure::adapters::joinpay_sign;
use crate::infrastructure::config::joinpay_config::JoinPayConfig;
use crate::ports::gateway_port::*;
use crate::ports::transport_port::TransportPort;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error};

/// 协议版本（p0_Version）
const PROTOCOL_VERSION: &str = "1.0";
/// 币种编码，人民币（p4_Cur）
const CURRENCY_CNY: &str = "1";
/// 统一下单接口路径
const UNIPAY_PATH: &str = "/uniPayApi.action";
/// 订单查询接口路径
const QUERY_PATH: &str = "/queryOrder.action";

/// 汇聚支付适配器实现
#[derive(Clone)]
pub struct JoinPayAdapter<T: TransportPort> {
    config: Arc<JoinPayConfig>,
    transport: Arc<T>,
}

impl<T: TransportPort> JoinPayAdapter<T> {
    pub fn new(config: Arc<JoinPayConfig>, transport: Arc<T>) -> Self {
        Self { config, transport }
    }

    /// 构建下单报文字段集。q5_OpenId为空时整键省略，
    /// 省略与空串在签名上并不等价。
    fn build_create_fields(
        &self,
        request: &GatewayOrderRequest,
        trade_type: TradeType,
    ) -> BTreeMap<String, String> {
        let mut fields = BTreeMap::new();
        fields.insert("p0_Version".to_string(), PROTOCOL_VERSION.to_string());
        fields.insert("p1_MerchantNo".to_string(), self.config.merchant_no.clone());
        fields.insert("p2_OrderNo".to_string(), request.out_order_no.clone());
        fields.insert("p3_Amount".to_string(), request.amount_cents.to_string());
        fields.insert("p4_Cur".to_string(), CURRENCY_CNY.to_string());
        fields.insert("p5_ProductName".to_string(), request.title.clone());
        fields.insert("p6_ProductDesc".to_string(), request.description.clone());
        fields.insert("p9_NotifyUrl".to_string(), self.notify_url(&request.trade_param));
        fields.insert("q1_FrpCode".to_string(), trade_type.frp_code().to_string());
        if let Some(openid) = request.openid.as_deref() {
            if !openid.is_empty() {
                fields.insert("q5_OpenId".to_string(), openid.to_string());
            }
        }
        fields.insert("q7_AppId".to_string(), self.config.app_id.clone());
        fields.insert(
            "qa_TradeMerchantNo".to_string(),
            self.config.trade_merchant_no.clone(),
        );
        fields
    }

    /// 异步通知回调地址，按支付通道组合标识参数化
    fn notify_url(&self, trade_param: &str) -> String {
        format!(
            "{}/api/notify/joinpay/{}",
            self.config.notify_base_url.trim_end_matches('/'),
            trade_param
        )
    }

    /// 签名后提交报文并解析应答体为JSON。hmac在报文末尾追加。
    async fn request(
        &self,
        path: &str,
        fields: BTreeMap<String, String>,
    ) -> DomainResult<Value> {
        let hmac = joinpay_sign::sign(&fields, &self.config.merchant_key);
        let mut form: Vec<(String, String)> = fields.into_iter().collect();
        form.push((joinpay_sign::HMAC_FIELD.to_string(), hmac));

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), path);
        let body = self.transport.post_form(&url, &form).await?;
        debug!("JoinPay response body: {}", body);

        serde_json::from_str(&body)
            .map_err(|e| DomainError::TransportError(format!("non-JSON gateway response: {e}")))
    }

    /// 解析下单应答信封：ra_Code为100时返回rc_Result内的支付参数，
    /// 携带rb_CodeMsg视为网关拒绝，其余形态视为协议异常。
    fn parse_envelope(envelope: Value) -> DomainResult<Value> {
        if envelope.get("ra_Code").and_then(int_value) == Some(GATEWAY_SUCCESS_CODE) {
            let inner = envelope
                .get("rc_Result")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    DomainError::ProtocolError("missing rc_Result in success envelope".to_string())
                })?;
            return serde_json::from_str(inner).map_err(|e| {
                DomainError::ProtocolError(format!("invalid rc_Result payload: {e}"))
            });
        }

        if let Some(message) = envelope.get("rb_CodeMsg").and_then(Value::as_str) {
            error!("JoinPay rejected request: {}", message);
            return Err(DomainError::GatewayRejected(message.to_string()));
        }

        Err(DomainError::ProtocolError(format!(
            "unexpected response envelope: {envelope}"
        )))
    }
}

/// 宽松读取整数字段，网关对数值字段混用数字与数字字符串
fn int_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl<T: TransportPort> GatewayPort for JoinPayAdapter<T> {
    /// 创建支付订单
    async fn create_order(
        &self,
        request: GatewayOrderRequest,
    ) -> DomainResult<GatewayOrderResponse> {
        let trade_type = TradeType::resolve(&request.payment_type)
            .ok_or_else(|| DomainError::ConfigurationError(request.payment_type.clone()))?;

        let fields = self.build_create_fields(&request, trade_type);
        debug!("JoinPay create order: {} fields for {}", fields.len(), request.out_order_no);

        let envelope = self.request(UNIPAY_PATH, fields).await?;
        let pay_params = Self::parse_envelope(envelope)?;

        Ok(GatewayOrderResponse { pay_params })
    }

    /// 查询订单
    async fn query_order(&self, out_order_no: &str) -> DomainResult<GatewayQueryResponse> {
        let fields = BTreeMap::from([
            ("p1_MerchantNo".to_string(), self.config.merchant_no.clone()),
            ("p2_OrderNo".to_string(), out_order_no.to_string()),
        ]);

        let raw = self.request(QUERY_PATH, fields).await?;
        Ok(GatewayQueryResponse { raw })
    }

    /// 验证异步通知签名
    fn verify_notify(&self, fields: &BTreeMap<String, String>) -> bool {
        joinpay_sign::verify(fields, &self.config.merchant_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// 记录出站报文并返回预置应答的传输桩
    struct MockTransport {
        response: DomainResult<String>,
        requests: Mutex<Vec<(String, Vec<(String, String)>)>>,
    }

    impl MockTransport {
        fn replying(body: &str) -> Self {
            Self {
                response: Ok(body.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn failing(error: DomainError) -> Self {
            Self {
                response: Err(error),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn captured(&self) -> Vec<(String, Vec<(String, String)>)> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TransportPort for MockTransport {
        async fn post_form(&self, url: &str, form: &[(String, String)]) -> DomainResult<String> {
            self.requests
                .lock()
                .unwrap()
                .push((url.to_string(), form.to_vec()));
            match &self.response {
                Ok(body) => Ok(body.clone()),
                Err(DomainError::TransportError(e)) => {
                    Err(DomainError::TransportError(e.clone()))
                }
                Err(_) => unreachable!("mock only carries transport errors"),
            }
        }
    }

    fn test_config() -> Arc<JoinPayConfig> {
        Arc::new(JoinPayConfig {
            app_id: "APP001".to_string(),
            trade_merchant_no: "777000000001".to_string(),
            merchant_no: "888000000001".to_string(),
            merchant_key: "test-merchant-key".to_string(),
            base_url: "https://www.joinpay.com/trade".to_string(),
            notify_base_url: "https://shop.example.com".to_string(),
        })
    }

    fn order_request(openid: Option<&str>) -> GatewayOrderRequest {
        GatewayOrderRequest {
            out_order_no: "T1".to_string(),
            amount_cents: 1000,
            title: "X".to_string(),
            description: "test order".to_string(),
            openid: openid.map(str::to_string),
            payment_type: "joinpay_xcx".to_string(),
            trade_param: "joinpay_xcx-CH001".to_string(),
        }
    }

    fn adapter(transport: MockTransport) -> (JoinPayAdapter<MockTransport>, Arc<MockTransport>) {
        let transport = Arc::new(transport);
        (
            JoinPayAdapter::new(test_config(), transport.clone()),
            transport,
        )
    }

    const SUCCESS_BODY: &str =
        r#"{"ra_Code":100,"rc_Result":"{\"r0_Version\":\"1.0\",\"r1_MerchantNo\":\"888000000001\"}"}"#;

    #[tokio::test]
    async fn test_create_order_success_returns_pay_params() {
        let (adapter, transport) = adapter(MockTransport::replying(SUCCESS_BODY));

        let response = adapter
            .create_order(order_request(Some("openid123")))
            .await
            .unwrap();

        assert_eq!(response.pay_params["r1_MerchantNo"], "888000000001");

        let captured = transport.captured();
        assert_eq!(captured.len(), 1);
        let (url, form) = &captured[0];
        assert_eq!(url, "https://www.joinpay.com/trade/uniPayApi.action");

        let fields: BTreeMap<String, String> = form.iter().cloned().collect();
        assert_eq!(fields["p0_Version"], "1.0");
        assert_eq!(fields["p1_MerchantNo"], "888000000001");
        assert_eq!(fields["p2_OrderNo"], "T1");
        assert_eq!(fields["p3_Amount"], "1000");
        assert_eq!(fields["p4_Cur"], "1");
        assert_eq!(fields["q1_FrpCode"], "WEIXIN_XCX");
        assert_eq!(fields["q5_OpenId"], "openid123");
        assert_eq!(fields["q7_AppId"], "APP001");
        assert_eq!(fields["qa_TradeMerchantNo"], "777000000001");
        assert_eq!(
            fields["p9_NotifyUrl"],
            "https://shop.example.com/api/notify/joinpay/joinpay_xcx-CH001"
        );

        // hmac在报文末尾追加，且可用同一规则验签
        assert_eq!(form.last().unwrap().0, "hmac");
        assert!(joinpay_sign::verify(&fields, "test-merchant-key"));
    }

    #[tokio::test]
    async fn test_create_order_accepts_numeric_string_code() {
        let body = r#"{"ra_Code":"100","rc_Result":"{\"ok\":1}"}"#;
        let (adapter, _) = adapter(MockTransport::replying(body));

        let response = adapter.create_order(order_request(None)).await.unwrap();

        assert_eq!(response.pay_params["ok"], 1);
    }

    #[tokio::test]
    async fn test_create_order_omits_empty_openid_key() {
        let (adapter, transport) = adapter(MockTransport::replying(SUCCESS_BODY));

        adapter.create_order(order_request(Some(""))).await.unwrap();
        adapter.create_order(order_request(None)).await.unwrap();

        let captured = transport.captured();
        let empty: BTreeMap<String, String> = captured[0].1.iter().cloned().collect();
        let absent: BTreeMap<String, String> = captured[1].1.iter().cloned().collect();

        assert!(!empty.contains_key("q5_OpenId"));
        assert!(!absent.contains_key("q5_OpenId"));
        // 整键省略后，两种构造方式的摘要一致
        assert_eq!(empty["hmac"], absent["hmac"]);
    }

    #[tokio::test]
    async fn test_create_order_gateway_rejection() {
        let (adapter, _) =
            adapter(MockTransport::replying(r#"{"rb_CodeMsg":"insufficient config"}"#));

        let error = adapter.create_order(order_request(None)).await.unwrap_err();

        match error {
            DomainError::GatewayRejected(message) => assert_eq!(message, "insufficient config"),
            other => panic!("expected GatewayRejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_order_malformed_envelope() {
        let (adapter, _) = adapter(MockTransport::replying(r#"{"foo":"bar"}"#));

        let error = adapter.create_order(order_request(None)).await.unwrap_err();

        assert!(matches!(error, DomainError::ProtocolError(_)));
    }

    #[tokio::test]
    async fn test_create_order_non_json_body_is_transport_error() {
        let (adapter, _) = adapter(MockTransport::replying("<html>bad gateway</html>"));

        let error = adapter.create_order(order_request(None)).await.unwrap_err();

        assert!(matches!(error, DomainError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_create_order_propagates_transport_failure() {
        let (adapter, _) = adapter(MockTransport::failing(DomainError::TransportError(
            "connection timed out".to_string(),
        )));

        let error = adapter.create_order(order_request(None)).await.unwrap_err();

        assert!(matches!(error, DomainError::TransportError(_)));
    }

    #[tokio::test]
    async fn test_create_order_unregistered_type_skips_network() {
        let (adapter, transport) = adapter(MockTransport::replying(SUCCESS_BODY));
        let mut request = order_request(None);
        request.payment_type = "balance".to_string();

        let error = adapter.create_order(request).await.unwrap_err();

        assert!(matches!(error, DomainError::ConfigurationError(_)));
        assert!(transport.captured().is_empty());
    }

    #[tokio::test]
    async fn test_query_order_signs_minimal_payload() {
        let body = r#"{"r2_OrderNo":"T1","ra_Status":"100"}"#;
        let (adapter, transport) = adapter(MockTransport::replying(body));

        let response = adapter.query_order("T1").await.unwrap();

        assert_eq!(response.raw["r2_OrderNo"], "T1");

        let captured = transport.captured();
        let (url, form) = &captured[0];
        assert_eq!(url, "https://www.joinpay.com/trade/queryOrder.action");
        let fields: BTreeMap<String, String> = form.iter().cloned().collect();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["p1_MerchantNo"], "888000000001");
        assert_eq!(fields["p2_OrderNo"], "T1");
        assert!(joinpay_sign::verify(&fields, "test-merchant-key"));
    }

    #[test]
    fn test_verify_notify_uses_merchant_key() {
        let (adapter, _) = adapter(MockTransport::replying("{}"));

        let mut fields = BTreeMap::from([
            ("r2_OrderNo".to_string(), "T1".to_string()),
            ("r6_Status".to_string(), "100".to_string()),
        ]);
        fields.insert(
            joinpay_sign::HMAC_FIELD.to_string(),
            joinpay_sign::sign(&fields, "test-merchant-key"),
        );

        assert!(adapter.verify_notify(&fields));

        fields.insert("r6_Status".to_string(), "101".to_string());
        assert!(!adapter.verify_notify(&fields));
    }
}

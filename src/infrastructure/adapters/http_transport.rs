use crate::domain::errors::{DomainError, DomainResult};
use crate::ports::transport_port::TransportPort;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// 出站请求超时，网关未约定超时策略，此处显式设定上限
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// 基于reqwest的传输实现
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> DomainResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DomainError::TransportError(format!("build http client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl TransportPort for HttpTransport {
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> DomainResult<String> {
        debug!("POST {} ({} fields)", url, form.len());

        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(|e| DomainError::TransportError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            error!("Gateway HTTP error: {} - {}", url, status);
            return Err(DomainError::TransportError(format!(
                "gateway returned {status}"
            )));
        }

        response
            .text()
            .await
            .map_err(|e| DomainError::TransportError(e.to_string()))
    }
}

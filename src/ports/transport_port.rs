use crate::domain::errors::DomainResult;
use async_trait::async_trait;

/// 外部传输端口接口，屏蔽网关客户端对真实网络的依赖
#[async_trait]
pub trait TransportPort: Send + Sync {
    /// 以表单编码POST报文并返回应答体文本
    async fn post_form(&self, url: &str, form: &[(String, String)]) -> DomainResult<String>;
}

//! 注册中心命名接口代理
//!
//! 所有命名接口调用都经过 `request_api`：按轮询顺序挑选节点，
//! 失败（网络错误、超时、非 2xx）后换下一个节点，直到尝试预算耗尽。

use http::Method;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::endpoint::EndpointCursor;
use super::executor::{RegistryRequest, RequestExecutor};
use crate::config::{ClientConfig, ServerConfig};
use crate::error::{NamingError, Result};
use crate::model::{
    DeregisterInstanceParam, RegisterInstanceParam, Service, ServiceKey, ServiceList,
    UpdateInstanceParam,
};
use crate::retry::RetryPolicy;
use crate::utils::{DEFAULT_GROUP, get_grouped_name};

/// 实例注册/注销/更新接口
pub const INSTANCE_PATH: &str = "/v1/ns/instance";
/// 实例列表查询接口
pub const INSTANCE_LIST_PATH: &str = "/v1/ns/instance/list";
/// 服务列表查询接口
pub const SERVICE_LIST_PATH: &str = "/v1/ns/service/list";
/// 心跳接口
pub const BEAT_PATH: &str = "/v1/ns/instance/beat";

const CLIENT_VERSION: &str = concat!("flare-naming-client:v", env!("CARGO_PKG_VERSION"));

/// 注册中心命名接口代理
pub struct NamingProxy {
    config: ClientConfig,
    cursor: Arc<EndpointCursor>,
    executor: Arc<dyn RequestExecutor>,
    retry: Arc<dyn RetryPolicy>,
}

impl NamingProxy {
    /// 创建代理
    pub fn new(
        config: ClientConfig,
        cursor: Arc<EndpointCursor>,
        executor: Arc<dyn RequestExecutor>,
        retry: Arc<dyn RetryPolicy>,
    ) -> Self {
        Self {
            config,
            cursor,
            executor,
            retry,
        }
    }

    /// 客户端配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 调用命名接口，返回成功响应的响应体
    ///
    /// 尝试预算耗尽时返回 `RegistryUnavailable`，携带最后一次尝试的错误
    pub async fn request_api(
        &self,
        method: Method,
        api_path: &str,
        params: HashMap<String, String>,
    ) -> Result<String> {
        let budget = self.retry.attempt_budget(self.cursor.len());
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < budget {
            attempts += 1;
            let server = self.cursor.next();
            let url = server.url(api_path);
            let timeout = server
                .timeout_ms
                .map(Duration::from_millis)
                .unwrap_or_else(|| self.config.timeout());

            let request = RegistryRequest {
                method: method.clone(),
                url: url.clone(),
                headers: self.headers(server),
                timeout,
                params: params.clone(),
            };

            debug!(method = %method, endpoint = %url, attempt = attempts, "Sending registry request");

            let error = match tokio::time::timeout(timeout, self.executor.execute(request)).await {
                Ok(Ok(resp)) if resp.is_success() => return Ok(resp.body),
                Ok(Ok(resp)) => NamingError::RegistryStatus {
                    endpoint: url.clone(),
                    status: resp.status.as_u16(),
                    body: resp.body,
                },
                Ok(Err(e)) => NamingError::transport(&url, e.to_string()),
                Err(_) => NamingError::timeout(
                    &url,
                    format!("request timed out after {}ms", timeout.as_millis()),
                ),
            };

            warn!(
                method = %method,
                endpoint = %url,
                attempt = attempts,
                budget,
                error = %error,
                "Registry request failed"
            );

            let retry = attempts < budget && self.retry.should_retry(attempts, &error);
            last_error = Some(error);
            if !retry {
                break;
            }

            let backoff = self.retry.backoff_duration(attempts);
            if !backoff.is_zero() {
                tokio::time::sleep(backoff).await;
            }
        }

        Err(NamingError::RegistryUnavailable {
            attempts,
            last_error: Box::new(
                last_error
                    .unwrap_or_else(|| NamingError::configuration("no registry request was made")),
            ),
        })
    }

    /// 注册实例
    pub async fn register_instance(&self, param: &RegisterInstanceParam) -> Result<bool> {
        let group = group_or_default(&param.group_name);
        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), self.config.namespace_id.clone());
        params.insert(
            "serviceName".to_string(),
            get_grouped_name(&param.service_name, group),
        );
        params.insert("groupName".to_string(), group.to_string());
        params.insert("app".to_string(), self.config.app_name.clone());
        params.insert("clusterName".to_string(), param.cluster_name.clone());
        params.insert("ip".to_string(), param.ip.clone());
        params.insert("port".to_string(), param.port.to_string());
        params.insert("weight".to_string(), format_weight(param.weight));
        params.insert("enable".to_string(), param.enable.to_string());
        params.insert("healthy".to_string(), param.healthy.to_string());
        params.insert("metadata".to_string(), encode_metadata(&param.metadata)?);
        params.insert("ephemeral".to_string(), param.ephemeral.to_string());

        let body = self.request_api(Method::POST, INSTANCE_PATH, params).await?;
        Ok(is_ok(&body))
    }

    /// 注销实例
    pub async fn deregister_instance(&self, param: &DeregisterInstanceParam) -> Result<bool> {
        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), self.config.namespace_id.clone());
        params.insert(
            "serviceName".to_string(),
            get_grouped_name(&param.service_name, &param.group_name),
        );
        params.insert("clusterName".to_string(), param.cluster.clone());
        params.insert("ip".to_string(), param.ip.clone());
        params.insert("port".to_string(), param.port.to_string());
        params.insert("ephemeral".to_string(), param.ephemeral.to_string());

        let body = self.request_api(Method::DELETE, INSTANCE_PATH, params).await?;
        Ok(is_ok(&body))
    }

    /// 更新实例
    pub async fn update_instance(&self, param: &UpdateInstanceParam) -> Result<bool> {
        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), self.config.namespace_id.clone());
        params.insert(
            "serviceName".to_string(),
            get_grouped_name(&param.service_name, &param.group_name),
        );
        params.insert("clusterName".to_string(), param.cluster_name.clone());
        params.insert("ip".to_string(), param.ip.clone());
        params.insert("port".to_string(), param.port.to_string());
        params.insert("weight".to_string(), format_weight(param.weight));
        params.insert("enable".to_string(), param.enable.to_string());
        params.insert("metadata".to_string(), encode_metadata(&param.metadata)?);
        params.insert("ephemeral".to_string(), param.ephemeral.to_string());

        let body = self.request_api(Method::PUT, INSTANCE_PATH, params).await?;
        Ok(is_ok(&body))
    }

    /// 查询服务实例列表并解析为服务快照
    pub async fn query_list(&self, key: &ServiceKey) -> Result<Service> {
        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), self.config.namespace_id.clone());
        params.insert("serviceName".to_string(), key.grouped_name.clone());
        params.insert("clusters".to_string(), key.clusters.clone());
        params.insert("healthyOnly".to_string(), "false".to_string());
        params.insert("clientIP".to_string(), String::new());
        params.insert("udpPort".to_string(), "0".to_string());

        let body = self.request_api(Method::GET, INSTANCE_LIST_PATH, params).await?;
        parse_service(&body, key)
    }

    /// 分页查询服务名
    pub async fn get_service_list(
        &self,
        namespace_id: &str,
        group_name: &str,
        page_no: u32,
        page_size: u32,
    ) -> Result<ServiceList> {
        let namespace_id = if namespace_id.is_empty() {
            self.config.namespace_id.as_str()
        } else {
            namespace_id
        };

        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), namespace_id.to_string());
        params.insert(
            "groupName".to_string(),
            group_or_default(group_name).to_string(),
        );
        params.insert("pageNo".to_string(), page_no.to_string());
        params.insert("pageSize".to_string(), page_size.to_string());

        let body = self.request_api(Method::GET, SERVICE_LIST_PATH, params).await?;
        serde_json::from_str(&body)
            .map_err(|e| NamingError::serialization(format!("invalid service list: {}", e)))
    }

    /// 发送心跳
    pub async fn send_beat(&self, grouped_name: &str, beat_json: String) -> Result<()> {
        let mut params = HashMap::new();
        params.insert("namespaceId".to_string(), self.config.namespace_id.clone());
        params.insert("serviceName".to_string(), grouped_name.to_string());
        params.insert("beat".to_string(), beat_json);

        self.request_api(Method::PUT, BEAT_PATH, params).await?;
        Ok(())
    }

    fn headers(&self, server: &ServerConfig) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        headers.insert("Client-Version".to_string(), CLIENT_VERSION.to_string());
        headers.insert("User-Agent".to_string(), CLIENT_VERSION.to_string());
        headers.insert("Request-Module".to_string(), "Naming".to_string());
        for (key, value) in &server.headers {
            headers.insert(key.clone(), value.clone());
        }
        headers
    }
}

fn group_or_default(group_name: &str) -> &str {
    if group_name.is_empty() {
        DEFAULT_GROUP
    } else {
        group_name
    }
}

fn is_ok(body: &str) -> bool {
    body.trim() == "ok"
}

/// 权重按十进制输出，整数不带小数部分（`0`、`1`、`1.5`）
pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}

/// 元数据编码为 JSON 对象字符串，空时为 `{}`
pub fn encode_metadata(metadata: &HashMap<String, String>) -> Result<String> {
    Ok(serde_json::to_string(metadata)?)
}

fn parse_service(body: &str, key: &ServiceKey) -> Result<Service> {
    let mut service: Service = serde_json::from_str(body)
        .map_err(|e| NamingError::serialization(format!("invalid instance list: {}", e)))?;

    if service.name.is_empty() {
        service.name = key.grouped_name.clone();
    }
    if service.clusters.is_empty() {
        service.clusters = key.clusters.clone();
    }

    let short_name = key
        .grouped_name
        .split_once(crate::utils::SERVICE_INFO_SPLITER)
        .map(|(_, name)| name)
        .unwrap_or(&key.grouped_name)
        .to_string();
    for host in &mut service.hosts {
        if host.service_name.is_empty() {
            host.service_name = short_name.clone();
        }
        host.ensure_instance_id();
    }

    Ok(service)
}

//! 测试公共工具：脚本化的请求执行器和实例/服务构造函数

#![allow(dead_code)]

use async_trait::async_trait;
use flare_naming_client::config::ServerConfig;
use flare_naming_client::error::InfraResult;
use flare_naming_client::model::{Instance, Service};
use flare_naming_client::registry::{RegistryRequest, RegistryResponse, RequestExecutor};
use http::StatusCode;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// 一次脚本化的响应
#[derive(Debug, Clone)]
pub enum Reply {
    /// 返回状态码和响应体
    Status(u16, String),
    /// 网络层失败
    Fail(String),
    /// 等待一段时间后返回
    Delayed(Duration, u16, String),
}

impl Reply {
    pub fn ok() -> Self {
        Reply::Status(200, "ok".to_string())
    }

    pub fn json(body: impl Into<String>) -> Self {
        Reply::Status(200, body.into())
    }

    pub fn unauthorized() -> Self {
        Reply::Status(401, "no security".to_string())
    }
}

/// 按脚本回复的请求执行器，记录所有收到的请求
pub struct MockExecutor {
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Reply>,
    requests: Mutex<Vec<RegistryRequest>>,
    calls: Arc<AtomicUsize>,
}

impl MockExecutor {
    /// 脚本为空时回复 `200 ok`
    pub fn new() -> Arc<Self> {
        Self::with_fallback(Reply::ok())
    }

    pub fn with_fallback(fallback: Reply) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            requests: Mutex::new(Vec::new()),
            calls: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// 追加一次性回复
    pub fn push(&self, reply: Reply) {
        self.script.lock().unwrap().push_back(reply);
    }

    /// 替换脚本为空时的回复
    pub fn set_fallback(&self, reply: Reply) {
        *self.fallback.lock().unwrap() = reply;
    }

    pub fn requests(&self) -> Vec<RegistryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// 某个接口路径被调用的次数
    pub fn calls_to(&self, api_path: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.ends_with(api_path))
            .count()
    }
}

#[async_trait]
impl RequestExecutor for MockExecutor {
    async fn execute(&self, request: RegistryRequest) -> InfraResult<RegistryResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);

        let reply = {
            let next = self.script.lock().unwrap().pop_front();
            next.unwrap_or_else(|| self.fallback.lock().unwrap().clone())
        };

        match reply {
            Reply::Status(status, body) => Ok(response(status, body)),
            Reply::Fail(reason) => Err(anyhow::anyhow!(reason)),
            Reply::Delayed(delay, status, body) => {
                tokio::time::sleep(delay).await;
                Ok(response(status, body))
            }
        }
    }
}

fn response(status: u16, body: String) -> RegistryResponse {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    RegistryResponse::new(status, body)
}

/// 测试用注册中心节点
pub fn test_server() -> ServerConfig {
    ServerConfig::new("console.nacos.io", 80).with_context_path("/nacos")
}

pub fn test_servers(count: usize) -> Vec<ServerConfig> {
    (0..count)
        .map(|i| ServerConfig::new(format!("10.0.0.{}", i + 1), 8848).with_context_path("/nacos"))
        .collect()
}

/// 构造实例
pub fn host(ip: &str, weight: f64, healthy: bool, enable: bool) -> Instance {
    Instance::new(ip, 80)
        .with_weight(weight)
        .with_health(healthy)
        .with_enable(enable)
        .with_cluster("a")
        .with_service("DEMO")
        .with_instance_id(format!("{}-80-a-DEMO", ip))
}

/// 五个实例：两个可选，一个不健康，一个禁用，一个权重为 0
pub fn demo_service() -> Service {
    Service::new("DEFAULT_GROUP@@DEMO")
        .with_cache_millis(1000)
        .with_clusters("a")
        .with_checksum("3bbcf6dd1175203a8afdade0e77a27cd1528787794594")
        .with_last_ref_time(1528787794594)
        .with_hosts(vec![
            host("10.10.10.10", 1.0, true, true),
            host("10.10.10.11", 1.0, true, true),
            host("10.10.10.12", 1.0, false, true),
            host("10.10.10.13", 1.0, true, false),
            host("10.10.10.14", 0.0, true, true),
        ])
}

/// 注册中心实例列表接口的响应体
pub fn instance_list_body(checksum: &str, hosts: Vec<Instance>) -> String {
    let service = Service::new("DEFAULT_GROUP@@DEMO")
        .with_checksum(checksum)
        .with_cache_millis(10_000)
        .with_hosts(hosts);
    serde_json::to_string(&service).unwrap()
}

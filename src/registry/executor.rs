//! 请求执行器
//!
//! 注册中心的 HTTP 传输被抽象为 `RequestExecutor`，默认实现基于 reqwest，
//! 测试中可以替换为脚本化的实现。

use async_trait::async_trait;
use http::{Method, StatusCode};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::InfraResult;

/// 一次注册中心请求
#[derive(Debug, Clone)]
pub struct RegistryRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub timeout: Duration,
    /// 扁平的字符串参数表
    pub params: HashMap<String, String>,
}

/// 注册中心响应
#[derive(Debug, Clone)]
pub struct RegistryResponse {
    pub status: StatusCode,
    pub body: String,
}

impl RegistryResponse {
    /// 创建响应
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 状态码是否为 2xx
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// 请求执行器 trait
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// 执行请求，返回状态码和响应体；网络层失败返回错误
    async fn execute(&self, request: RegistryRequest) -> InfraResult<RegistryResponse>;
}

/// 基于 reqwest 的请求执行器
///
/// GET/DELETE 把参数放在查询串中，POST/PUT 以表单提交
#[derive(Clone)]
pub struct ReqwestExecutor {
    client: reqwest::Client,
}

impl ReqwestExecutor {
    /// 创建执行器
    pub fn new() -> InfraResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self { client })
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: RegistryRequest) -> InfraResult<RegistryResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        builder = if request.method == Method::GET || request.method == Method::DELETE {
            builder.query(&request.params)
        } else {
            builder.form(&request.params)
        };

        let resp = builder.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        Ok(RegistryResponse { status, body })
    }
}

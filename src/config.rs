//! 命名客户端配置

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{NamingError, Result};

/// 完整配置（客户端配置 + 注册中心节点列表）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NamingConfig {
    #[serde(default)]
    pub client: ClientConfig,
    pub servers: Vec<ServerConfig>,
}

/// 客户端配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// 命名空间 ID（空字符串表示 public）
    pub namespace_id: String,
    /// 单次请求超时（毫秒）
    pub timeout_ms: u64,
    /// 心跳间隔（毫秒）
    pub beat_interval_ms: u64,
    /// 磁盘缓存根目录
    pub cache_dir: PathBuf,
    /// 启动时不加载磁盘缓存
    pub not_load_cache_at_start: bool,
    /// 后台刷新间隔下限（毫秒）
    pub refresh_floor_ms: u64,
    /// 单次调用的最大尝试次数
    pub max_retry: usize,
    /// 尝试次数是否不超过注册中心节点数
    pub cap_retry_by_servers: bool,
    /// 应用名
    pub app_name: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            namespace_id: String::new(),
            timeout_ms: 10_000,
            beat_interval_ms: 5_000,
            cache_dir: std::env::temp_dir().join("nacos").join("cache"),
            not_load_cache_at_start: false,
            refresh_floor_ms: 1_000,
            max_retry: 3,
            cap_retry_by_servers: true,
            app_name: String::new(),
        }
    }
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置命名空间
    pub fn with_namespace_id(mut self, namespace_id: impl Into<String>) -> Self {
        self.namespace_id = namespace_id.into();
        self
    }

    /// 设置请求超时
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// 设置心跳间隔
    pub fn with_beat_interval_ms(mut self, beat_interval_ms: u64) -> Self {
        self.beat_interval_ms = beat_interval_ms;
        self
    }

    /// 设置磁盘缓存目录
    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = cache_dir.into();
        self
    }

    /// 启用/禁用启动时加载磁盘缓存
    pub fn with_not_load_cache_at_start(mut self, not_load: bool) -> Self {
        self.not_load_cache_at_start = not_load;
        self
    }

    /// 设置后台刷新间隔下限
    pub fn with_refresh_floor_ms(mut self, refresh_floor_ms: u64) -> Self {
        self.refresh_floor_ms = refresh_floor_ms;
        self
    }

    /// 设置最大尝试次数
    pub fn with_max_retry(mut self, max_retry: usize) -> Self {
        self.max_retry = max_retry;
        self
    }

    /// 设置尝试次数是否受节点数限制
    pub fn with_cap_retry_by_servers(mut self, cap: bool) -> Self {
        self.cap_retry_by_servers = cap;
        self
    }

    /// 设置应用名
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// 单次请求超时
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// 心跳间隔
    pub fn beat_interval(&self) -> Duration {
        Duration::from_millis(self.beat_interval_ms)
    }

    /// 后台刷新间隔下限
    pub fn refresh_floor(&self) -> Duration {
        Duration::from_millis(self.refresh_floor_ms)
    }

    /// 当前命名空间对应的磁盘缓存目录
    pub fn naming_cache_dir(&self) -> PathBuf {
        let namespace = if self.namespace_id.is_empty() {
            "public"
        } else {
            self.namespace_id.as_str()
        };
        self.cache_dir.join("naming").join(namespace)
    }
}

/// 注册中心节点配置
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServerConfig {
    #[serde(default = "default_scheme")]
    pub scheme: String,
    pub ip_addr: String,
    pub port: u16,
    #[serde(default = "default_context_path")]
    pub context_path: String,
    /// 覆盖客户端的请求超时（毫秒）
    #[serde(default)]
    pub timeout_ms: Option<u64>,
    /// 附加请求头
    #[serde(default)]
    pub headers: HashMap<String, String>,
}

fn default_scheme() -> String {
    "http".to_string()
}

fn default_context_path() -> String {
    "/nacos".to_string()
}

impl ServerConfig {
    /// 创建节点配置
    pub fn new(ip_addr: impl Into<String>, port: u16) -> Self {
        Self {
            scheme: default_scheme(),
            ip_addr: ip_addr.into(),
            port,
            context_path: default_context_path(),
            timeout_ms: None,
            headers: HashMap::new(),
        }
    }

    /// 设置上下文路径
    pub fn with_context_path(mut self, context_path: impl Into<String>) -> Self {
        self.context_path = context_path.into();
        self
    }

    /// 设置协议
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// 设置超时覆盖
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// 添加请求头
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// 拼接 API 地址，例如 `http://console.nacos.io:80/nacos/v1/ns/instance`
    pub fn url(&self, api_path: &str) -> String {
        format!(
            "{}://{}:{}{}{}",
            self.scheme, self.ip_addr, self.port, self.context_path, api_path
        )
    }
}

impl NamingConfig {
    /// 从 TOML 文件加载配置
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: NamingConfig = toml::from_str(&content)
            .map_err(|e| NamingError::configuration(format!("{}: {}", path, e)))?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        if self.servers.is_empty() {
            return Err(NamingError::configuration("at least one server is required"));
        }
        if let Some(server) = self.servers.iter().find(|s| s.port == 0) {
            return Err(NamingError::configuration(format!(
                "server {} has port 0",
                server.ip_addr
            )));
        }
        if self.client.timeout_ms == 0 {
            return Err(NamingError::configuration("timeout_ms must be positive"));
        }
        Ok(())
    }
}

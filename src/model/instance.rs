//! 服务实例定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 服务实例
///
/// 字段名与注册中心返回的 JSON 保持一致（camelCase）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Instance {
    /// 实例 ID（注册中心未给出时由 ip/port/cluster/service 推导）
    pub instance_id: String,

    /// IP 地址
    pub ip: String,

    /// 端口
    pub port: u16,

    /// 权重（0 表示不参与负载均衡）
    pub weight: f64,

    /// 注册中心最近一次观察到的健康状态
    pub healthy: bool,

    /// 管理开关，与健康状态无关
    #[serde(rename = "enabled")]
    pub enable: bool,

    /// 是否临时实例
    pub ephemeral: bool,

    /// 生命周期标记
    pub valid: bool,

    /// 软删除标记
    pub marked: bool,

    /// 集群名
    pub cluster_name: String,

    /// 服务名
    pub service_name: String,

    /// 元数据
    pub metadata: HashMap<String, String>,
}

impl Instance {
    /// 创建新的服务实例（默认健康、启用、权重 1）
    pub fn new(ip: impl Into<String>, port: u16) -> Self {
        Self {
            ip: ip.into(),
            port,
            weight: 1.0,
            healthy: true,
            enable: true,
            ephemeral: true,
            valid: true,
            ..Default::default()
        }
    }

    /// 设置实例 ID
    pub fn with_instance_id(mut self, instance_id: impl Into<String>) -> Self {
        self.instance_id = instance_id.into();
        self
    }

    /// 设置权重
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// 设置健康状态
    pub fn with_health(mut self, healthy: bool) -> Self {
        self.healthy = healthy;
        self
    }

    /// 设置启用状态
    pub fn with_enable(mut self, enable: bool) -> Self {
        self.enable = enable;
        self
    }

    /// 设置集群
    pub fn with_cluster(mut self, cluster_name: impl Into<String>) -> Self {
        self.cluster_name = cluster_name.into();
        self
    }

    /// 设置服务名
    pub fn with_service(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = service_name.into();
        self
    }

    /// 添加元数据
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// 是否可以被单实例选择选中：启用、健康且权重大于 0
    pub fn is_selectable(&self) -> bool {
        self.enable && self.healthy && self.weight > 0.0
    }

    /// 由 ip、端口、集群和服务名推导实例 ID，例如 `10.10.10.10-80-a-DEMO`
    pub fn derive_id(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.ip, self.port, self.cluster_name, self.service_name
        )
    }

    /// 实例 ID 为空时补齐推导值
    pub fn ensure_instance_id(&mut self) {
        if self.instance_id.is_empty() {
            self.instance_id = self.derive_id();
        }
    }

    /// `ip:port`
    pub fn address(&self) -> String {
        format!("{}:{}", self.ip, self.port)
    }

    /// 转换为 HTTP URL
    pub fn to_http_url(&self) -> String {
        format!("http://{}", self.address())
    }
}

//! 服务快照定义

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::instance::Instance;
use crate::utils::{get_grouped_name, get_service_cache_key, join_clusters};

/// 服务快照：某个服务在注册中心的最近一次观察结果
///
/// `hosts` 为空表示服务存在但没有实例，与"服务未知"不同
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Service {
    /// 服务名（`group@@service`）
    pub name: String,

    /// 分组名
    pub group_name: String,

    /// 查询时指定的集群（逗号分隔）
    pub clusters: String,

    /// 注册中心建议的刷新间隔（毫秒）
    pub cache_millis: u64,

    /// 实例列表
    pub hosts: Vec<Instance>,

    /// 注册中心给出的快照指纹，只用于判断是否变化
    pub checksum: String,

    /// 最近一次成功拉取的时间（epoch 毫秒）
    pub last_ref_time: u64,

    /// 环境
    pub env: String,

    /// 元数据
    pub metadata: HashMap<String, String>,

    #[serde(rename = "useSpecifiedURL")]
    pub use_specified_url: bool,
}

impl Service {
    /// 创建空的服务快照
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// 设置实例列表
    pub fn with_hosts(mut self, hosts: Vec<Instance>) -> Self {
        self.hosts = hosts;
        self
    }

    /// 设置指纹
    pub fn with_checksum(mut self, checksum: impl Into<String>) -> Self {
        self.checksum = checksum.into();
        self
    }

    /// 设置刷新时间
    pub fn with_last_ref_time(mut self, last_ref_time: u64) -> Self {
        self.last_ref_time = last_ref_time;
        self
    }

    /// 设置建议刷新间隔
    pub fn with_cache_millis(mut self, cache_millis: u64) -> Self {
        self.cache_millis = cache_millis;
        self
    }

    /// 设置集群
    pub fn with_clusters(mut self, clusters: impl Into<String>) -> Self {
        self.clusters = clusters.into();
        self
    }

    /// 是否没有任何实例
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// 服务名分页列表
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct ServiceList {
    pub count: u64,
    pub doms: Vec<String>,
}

/// 一次服务查询的目标：分组后的服务名 + 集群
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceKey {
    /// `group@@service`
    pub grouped_name: String,
    /// 逗号分隔的集群，可以为空
    pub clusters: String,
}

impl ServiceKey {
    /// 由服务名、分组和集群构造，分组为空时使用 `DEFAULT_GROUP`
    pub fn new(service_name: &str, group_name: &str, clusters: &[String]) -> Self {
        Self {
            grouped_name: get_grouped_name(service_name, group_name),
            clusters: join_clusters(clusters),
        }
    }

    /// 内存表和磁盘缓存使用的键
    pub fn cache_key(&self) -> String {
        get_service_cache_key(&self.grouped_name, &self.clusters)
    }
}

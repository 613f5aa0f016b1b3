//! 客户端调用参数

use std::collections::HashMap;

/// 注册实例参数
#[derive(Debug, Clone, Default)]
pub struct RegisterInstanceParam {
    pub ip: String,
    pub port: u16,
    pub weight: f64,
    pub enable: bool,
    pub healthy: bool,
    pub metadata: HashMap<String, String>,
    pub cluster_name: String,
    pub service_name: String,
    /// 为空时使用 `DEFAULT_GROUP`
    pub group_name: String,
    pub ephemeral: bool,
}

/// 注销实例参数
#[derive(Debug, Clone, Default)]
pub struct DeregisterInstanceParam {
    pub ip: String,
    pub port: u16,
    pub cluster: String,
    pub service_name: String,
    pub group_name: String,
    pub ephemeral: bool,
}

/// 更新实例参数（健康状态不能由客户端设置，因此没有 `healthy`）
#[derive(Debug, Clone, Default)]
pub struct UpdateInstanceParam {
    pub ip: String,
    pub port: u16,
    pub weight: f64,
    pub enable: bool,
    pub metadata: HashMap<String, String>,
    pub cluster_name: String,
    pub service_name: String,
    pub group_name: String,
    pub ephemeral: bool,
}

/// 获取服务快照参数
#[derive(Debug, Clone, Default)]
pub struct GetServiceParam {
    pub clusters: Vec<String>,
    pub service_name: String,
    pub group_name: String,
}

/// 获取全部实例参数
#[derive(Debug, Clone, Default)]
pub struct SelectAllInstancesParam {
    pub clusters: Vec<String>,
    pub service_name: String,
    pub group_name: String,
}

/// 按健康状态获取实例参数
#[derive(Debug, Clone, Default)]
pub struct SelectInstancesParam {
    pub clusters: Vec<String>,
    pub service_name: String,
    pub group_name: String,
    /// true 返回健康实例，false 返回不健康实例
    pub healthy_only: bool,
}

/// 选择单个健康实例参数
#[derive(Debug, Clone, Default)]
pub struct SelectOneHealthInstanceParam {
    pub clusters: Vec<String>,
    pub service_name: String,
    pub group_name: String,
}

/// 分页获取服务名参数
#[derive(Debug, Clone)]
pub struct GetAllServiceInfoParam {
    /// 为空时使用客户端配置的命名空间
    pub namespace_id: String,
    pub group_name: String,
    pub page_no: u32,
    pub page_size: u32,
}

impl Default for GetAllServiceInfoParam {
    fn default() -> Self {
        Self {
            namespace_id: String::new(),
            group_name: String::new(),
            page_no: 1,
            page_size: 10,
        }
    }
}

//! Flare Naming Client Library
//!
//! 服务发现客户端：在内存和磁盘中保存服务到实例的快照，从注册中心刷新快照并容忍部分节点失败，
//! 按健康状态和权重为调用方选择实例。注册中心暂时不可达时，冷启动仍可使用上次保存的磁盘快照。

pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod model;
pub mod registry;
pub mod retry;
pub mod utils;

// Re-exports
pub use cache::{DiskStore, PathStyle};
pub use config::{ClientConfig, NamingConfig, ServerConfig};
pub use discovery::{InstanceSelector, InstanceTable, NamingClient, RefreshScheduler};
pub use error::{ErrorCategory, ErrorCode, NamingError, Result};
pub use model::{
    DeregisterInstanceParam, GetAllServiceInfoParam, GetServiceParam, Instance,
    RegisterInstanceParam, SelectAllInstancesParam, SelectInstancesParam,
    SelectOneHealthInstanceParam, Service, ServiceKey, ServiceList, UpdateInstanceParam,
};
pub use registry::{NamingProxy, RegistryFetcher, ReqwestExecutor, RequestExecutor};
pub use retry::{FixedRetryPolicy, RetryPolicy};
pub use utils::{DEFAULT_GROUP, get_grouped_name};

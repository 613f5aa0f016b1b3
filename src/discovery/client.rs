//! 命名客户端
//!
//! 对外的服务发现入口：注册/注销/更新实例，查询服务快照并从中选择实例。
//! 每个客户端拥有自己的节点游标、内存表和后台任务，同一进程中可以创建多个互不影响的客户端。

use futures::FutureExt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::scheduler::RefreshScheduler;
use super::selector::InstanceSelector;
use super::table::InstanceTable;
use crate::cache::DiskStore;
use crate::config::{ClientConfig, NamingConfig, ServerConfig};
use crate::error::{NamingError, Result};
use crate::model::{
    DeregisterInstanceParam, GetAllServiceInfoParam, GetServiceParam, Instance,
    RegisterInstanceParam, SelectAllInstancesParam, SelectInstancesParam,
    SelectOneHealthInstanceParam, Service, ServiceKey, ServiceList, UpdateInstanceParam,
};
use crate::registry::{
    BeatInfo, BeatReactor, EndpointCursor, NamingProxy, RegistryFetcher, ReqwestExecutor,
    RequestExecutor,
};
use crate::retry::FixedRetryPolicy;
use crate::utils::{DEFAULT_GROUP, get_grouped_name};

/// 命名客户端
pub struct NamingClient {
    config: ClientConfig,
    proxy: Arc<NamingProxy>,
    table: Arc<InstanceTable>,
    fetcher: Arc<RegistryFetcher>,
    scheduler: Arc<RefreshScheduler>,
    beat: BeatReactor,
    selector: InstanceSelector,
}

impl NamingClient {
    /// 使用给定的请求执行器创建客户端
    ///
    /// 未关闭启动加载时，先用磁盘缓存预热内存表，注册中心不可达时也能回答选择请求
    pub async fn new(
        config: ClientConfig,
        servers: Vec<ServerConfig>,
        executor: Arc<dyn RequestExecutor>,
    ) -> Result<Self> {
        let cursor = Arc::new(EndpointCursor::new(servers)?);
        let retry = Arc::new(
            FixedRetryPolicy::new(config.max_retry, Duration::ZERO)
                .with_cap_by_endpoints(config.cap_retry_by_servers),
        );
        let proxy = Arc::new(NamingProxy::new(config.clone(), cursor, executor, retry));
        let table = Arc::new(InstanceTable::new());

        let disk = match DiskStore::new(config.naming_cache_dir()).await {
            Ok(store) => Some(Arc::new(store)),
            Err(e) => {
                warn!(
                    dir = %config.naming_cache_dir().display(),
                    error = %e,
                    "⚠️ Disk cache unavailable, running memory-only"
                );
                None
            }
        };

        if let Some(store) = &disk {
            if !config.not_load_cache_at_start {
                let loaded = table.preload(store.load_all().await).await;
                info!(
                    dir = %store.root().display(),
                    services = loaded,
                    "📂 Loaded service snapshots from disk cache"
                );
            }
        }

        let fetcher = Arc::new(RegistryFetcher::new(proxy.clone(), table.clone(), disk));
        let scheduler = Arc::new(RefreshScheduler::new(
            fetcher.clone(),
            table.clone(),
            config.refresh_floor(),
        ));
        let beat = BeatReactor::new(proxy.clone(), config.beat_interval());

        Ok(Self {
            config,
            proxy,
            table,
            fetcher,
            scheduler,
            beat,
            selector: InstanceSelector::new(),
        })
    }

    /// 从完整配置创建客户端，使用 reqwest 执行请求
    pub async fn from_config(config: NamingConfig) -> Result<Self> {
        config.validate()?;
        let executor = ReqwestExecutor::new()
            .map_err(|e| NamingError::configuration(format!("http client: {}", e)))?;
        Self::new(config.client, config.servers, Arc::new(executor)).await
    }

    /// 替换实例选择器（例如使用固定种子）
    pub fn with_selector(mut self, selector: InstanceSelector) -> Self {
        self.selector = selector;
        self
    }

    /// 客户端配置
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 后台刷新调度器，可用于接入推送通道
    pub fn scheduler(&self) -> &Arc<RefreshScheduler> {
        &self.scheduler
    }

    /// 内存表
    pub fn table(&self) -> &Arc<InstanceTable> {
        &self.table
    }

    /// 注册实例，临时实例注册成功后开始发送心跳
    pub async fn register_instance(&self, param: RegisterInstanceParam) -> Result<bool> {
        validate_service_name(&param.service_name)?;
        let registered = self.proxy.register_instance(&param).await?;

        if registered && param.ephemeral {
            let group = group_or_default(&param.group_name);
            let grouped_name = get_grouped_name(&param.service_name, group);
            let beat = BeatInfo {
                ip: param.ip.clone(),
                port: param.port,
                weight: param.weight,
                service_name: grouped_name.clone(),
                cluster: param.cluster_name.clone(),
                metadata: param.metadata.clone(),
                scheduled: false,
                period: 0,
            };
            self.beat.add_beat(&grouped_name, beat).await?;
        }

        info!(
            service = %param.service_name,
            ip = %param.ip,
            port = param.port,
            registered,
            "✅ Instance registered"
        );
        Ok(registered)
    }

    /// 注销实例并停止其心跳
    pub async fn deregister_instance(&self, param: DeregisterInstanceParam) -> Result<bool> {
        validate_service_name(&param.service_name)?;
        let grouped_name =
            get_grouped_name(&param.service_name, group_or_default(&param.group_name));
        self.beat
            .remove_beat(&grouped_name, &param.ip, param.port)
            .await;

        let deregistered = self.proxy.deregister_instance(&param).await?;
        info!(
            service = %param.service_name,
            ip = %param.ip,
            port = param.port,
            deregistered,
            "Instance deregistered"
        );
        Ok(deregistered)
    }

    /// 更新实例
    pub async fn update_instance(&self, param: UpdateInstanceParam) -> Result<bool> {
        validate_service_name(&param.service_name)?;
        self.proxy.update_instance(&param).await
    }

    /// 获取服务快照
    ///
    /// 内存表中已有快照时直接返回；否则同步拉取（同一个键的并发首次请求只拉取一次），
    /// 并开始在后台周期刷新这个服务
    pub async fn get_service(&self, param: GetServiceParam) -> Result<Arc<Service>> {
        self.service_snapshot(&param.service_name, &param.group_name, &param.clusters)
            .await
    }

    /// 返回服务的全部实例
    pub async fn select_all_instances(
        &self,
        param: SelectAllInstancesParam,
    ) -> Result<Vec<Instance>> {
        let service = self
            .service_snapshot(&param.service_name, &param.group_name, &param.clusters)
            .await?;
        self.selector.select_all(&service)
    }

    /// 按健康状态返回实例
    pub async fn select_instances(&self, param: SelectInstancesParam) -> Result<Vec<Instance>> {
        let service = self
            .service_snapshot(&param.service_name, &param.group_name, &param.clusters)
            .await?;
        self.selector.select_many(&service, param.healthy_only)
    }

    /// 按权重选择一个可用实例
    pub async fn select_one_healthy_instance(
        &self,
        param: SelectOneHealthInstanceParam,
    ) -> Result<Instance> {
        let service = self
            .service_snapshot(&param.service_name, &param.group_name, &param.clusters)
            .await?;
        self.selector.select_one(&service)
    }

    /// 分页获取服务名
    pub async fn get_all_services_info(&self, param: GetAllServiceInfoParam) -> Result<ServiceList> {
        self.proxy
            .get_service_list(
                &param.namespace_id,
                &param.group_name,
                param.page_no,
                param.page_size,
            )
            .await
    }

    /// 立即刷新一个已被请求过的服务，返回是否找到对应的刷新任务
    pub async fn invalidate(&self, service_name: &str, group_name: &str, clusters: &[String]) -> bool {
        let key = ServiceKey::new(service_name, group_name, clusters);
        self.scheduler.invalidate(&key.cache_key()).await
    }

    /// 心跳管理器
    pub fn beat_reactor(&self) -> &BeatReactor {
        &self.beat
    }

    /// 停止全部后台任务（刷新和心跳）
    pub async fn shutdown(&self) {
        self.scheduler.shutdown().await;
        self.beat.shutdown().await;
        info!("🛑 Naming client stopped");
    }

    async fn service_snapshot(
        &self,
        service_name: &str,
        group_name: &str,
        clusters: &[String],
    ) -> Result<Arc<Service>> {
        validate_service_name(service_name)?;
        let key = ServiceKey::new(service_name, group_name, clusters);
        let cache_key = key.cache_key();

        let fetcher = self.fetcher.clone();
        let load_key = key.clone();
        let service = self
            .table
            .get_or_load(&cache_key, move || {
                async move { fetcher.fetch(&load_key).await }.boxed()
            })
            .await?;

        self.scheduler.track(key).await;
        Ok(service)
    }
}

impl Drop for NamingClient {
    fn drop(&mut self) {
        // 没有显式调用 shutdown 时，后台任务仍持有代理，需要在这里通知它们退出
        if !self.scheduler.is_cancelled() || !self.beat.is_cancelled() {
            self.scheduler.cancel();
            self.beat.cancel();
            info!("🛑 Naming client dropped, background tasks cancelled");
        }
    }
}

fn validate_service_name(service_name: &str) -> Result<()> {
    if service_name.trim().is_empty() {
        return Err(NamingError::invalid_parameter("service name must not be empty"));
    }
    Ok(())
}

fn group_or_default(group_name: &str) -> &str {
    if group_name.is_empty() {
        DEFAULT_GROUP
    } else {
        group_name
    }
}

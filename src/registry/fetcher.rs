//! 注册中心拉取器
//!
//! 拉取成功后写穿：一次内存表写入 + 一次磁盘保存

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::proxy::NamingProxy;
use crate::cache::DiskStore;
use crate::discovery::table::InstanceTable;
use crate::error::Result;
use crate::model::{Service, ServiceKey};
use crate::utils::now_millis;

/// 注册中心拉取器
pub struct RegistryFetcher {
    proxy: Arc<NamingProxy>,
    table: Arc<InstanceTable>,
    disk: Option<Arc<DiskStore>>,
}

impl RegistryFetcher {
    /// 创建拉取器，`disk` 为 `None` 时只写内存表
    pub fn new(
        proxy: Arc<NamingProxy>,
        table: Arc<InstanceTable>,
        disk: Option<Arc<DiskStore>>,
    ) -> Self {
        Self { proxy, table, disk }
    }

    /// 拉取服务快照并写入内存表和磁盘
    ///
    /// `last_ref_time` 记为请求发出的时刻，这样先发出、后完成的拉取会被内存表当作过期结果丢弃。
    /// 指纹与已缓存快照一致时沿用已缓存的实例列表，只推进 `last_ref_time`。
    pub async fn fetch(&self, key: &ServiceKey) -> Result<Arc<Service>> {
        let cache_key = key.cache_key();
        let issued_at = now_millis();

        let fetched = self.proxy.query_list(key).await?;
        let previous = self.table.get(&cache_key).await;

        let snapshot = match previous {
            Some(prev) if !fetched.checksum.is_empty() && prev.checksum == fetched.checksum => {
                debug!(service = %cache_key, checksum = %prev.checksum, "Service unchanged since last fetch");
                let mut unchanged = (*prev).clone();
                unchanged.last_ref_time = issued_at;
                unchanged
            }
            prev => {
                let mut fresh = fetched;
                fresh.last_ref_time = issued_at;
                if let Some(prev) = prev {
                    info!(
                        service = %cache_key,
                        before = prev.hosts.len(),
                        after = fresh.hosts.len(),
                        "Service instances changed"
                    );
                }
                fresh
            }
        };

        let snapshot = Arc::new(snapshot);
        if !self.table.put(&cache_key, snapshot.clone()).await {
            // 更新的快照已经在表中，返回它
            return Ok(self.table.get(&cache_key).await.unwrap_or(snapshot));
        }

        if let Some(disk) = &self.disk {
            if let Err(e) = disk.save(&cache_key, &snapshot).await {
                warn!(service = %cache_key, error = %e, "Failed to write service snapshot to disk");
            }
        }

        Ok(snapshot)
    }
}

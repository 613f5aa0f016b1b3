//! 服务实例内存表
//!
//! 选择路径上读多写少：读者只在发布新快照的瞬间被写者阻塞，拉取期间不持锁。
//! 冷启动时同一个键的并发首次请求合并为一次拉取（singleflight），
//! 所有合并的调用方拿到同一个结果或同一个错误。

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use crate::error::Result;
use crate::model::Service;

type InflightFetch = Shared<BoxFuture<'static, Result<Arc<Service>>>>;

/// 服务实例内存表
#[derive(Default)]
pub struct InstanceTable {
    services: RwLock<HashMap<String, Arc<Service>>>,
    inflight: Mutex<HashMap<String, InflightFetch>>,
}

impl InstanceTable {
    /// 创建空表
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取快照
    pub async fn get(&self, key: &str) -> Option<Arc<Service>> {
        self.services.read().await.get(key).cloned()
    }

    /// 写入快照（整体替换）
    ///
    /// 新快照的 `last_ref_time` 早于已有快照时拒绝写入并返回 `false`
    pub async fn put(&self, key: &str, service: Arc<Service>) -> bool {
        let mut services = self.services.write().await;
        if let Some(current) = services.get(key) {
            if service.last_ref_time < current.last_ref_time {
                debug!(
                    service = %key,
                    current = current.last_ref_time,
                    incoming = service.last_ref_time,
                    "Discarding stale service snapshot"
                );
                return false;
            }
        }
        services.insert(key.to_string(), service);
        true
    }

    /// 全部键
    pub async fn keys(&self) -> Vec<String> {
        self.services.read().await.keys().cloned().collect()
    }

    /// 表中的服务数
    pub async fn len(&self) -> usize {
        self.services.read().await.len()
    }

    /// 表是否为空
    pub async fn is_empty(&self) -> bool {
        self.services.read().await.is_empty()
    }

    /// 用磁盘快照预热，返回实际写入的条数
    pub async fn preload(&self, entries: Vec<(String, Service)>) -> usize {
        let mut loaded = 0;
        for (key, service) in entries {
            if self.put(&key, Arc::new(service)).await {
                loaded += 1;
            }
        }
        loaded
    }

    /// 表中有快照时直接返回，否则执行 `load`；同一个键同时只有一个 `load` 在执行
    pub async fn get_or_load<F>(&self, key: &str, load: F) -> Result<Arc<Service>>
    where
        F: FnOnce() -> BoxFuture<'static, Result<Arc<Service>>>,
    {
        if let Some(service) = self.get(key).await {
            return Ok(service);
        }

        let fetch = {
            let mut inflight = self.inflight.lock().await;
            // 等锁期间可能已有拉取完成
            if let Some(service) = self.get(key).await {
                return Ok(service);
            }
            match inflight.get(key) {
                Some(fetch) => {
                    debug!(service = %key, "Joining in-flight fetch");
                    fetch.clone()
                }
                None => {
                    let fetch = load().shared();
                    inflight.insert(key.to_string(), fetch.clone());
                    fetch
                }
            }
        };

        let result = fetch.clone().await;

        let mut inflight = self.inflight.lock().await;
        if inflight
            .get(key)
            .map(|current| current.ptr_eq(&fetch))
            .unwrap_or(false)
        {
            inflight.remove(key);
        }

        result
    }

    /// 正在进行中的合并拉取数
    pub async fn inflight_count(&self) -> usize {
        self.inflight.lock().await.len()
    }
}

//! 后台刷新调度
//!
//! 每个被请求过的服务键一个后台任务，按服务的 `cache_millis`（不低于配置的下限）周期性拉取。
//! 拉取失败只记录日志，不清除已有快照。外部推送通过 `invalidate` 触发一次立即拉取。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, Notify, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::table::InstanceTable;
use crate::model::ServiceKey;
use crate::registry::RegistryFetcher;

/// 注册中心未给出 `cache_millis` 时的刷新间隔
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// 计算刷新间隔：`cache_millis` 为 0 时使用默认值，结果不低于 `floor`
pub fn refresh_interval(cache_millis: u64, floor: Duration) -> Duration {
    let advised = if cache_millis == 0 {
        DEFAULT_REFRESH_INTERVAL
    } else {
        Duration::from_millis(cache_millis)
    };
    advised.max(floor)
}

struct RefreshTask {
    notify: Arc<Notify>,
    token: CancellationToken,
}

/// 后台刷新调度器
pub struct RefreshScheduler {
    fetcher: Arc<RegistryFetcher>,
    table: Arc<InstanceTable>,
    floor: Duration,
    tasks: Mutex<HashMap<String, RefreshTask>>,
    shutdown: CancellationToken,
}

impl RefreshScheduler {
    /// 创建调度器
    pub fn new(fetcher: Arc<RegistryFetcher>, table: Arc<InstanceTable>, floor: Duration) -> Self {
        Self {
            fetcher,
            table,
            floor,
            tasks: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// 开始跟踪服务键，返回是否新建了刷新任务
    pub async fn track(&self, key: ServiceKey) -> bool {
        if self.shutdown.is_cancelled() {
            return false;
        }

        let cache_key = key.cache_key();
        let mut tasks = self.tasks.lock().await;
        if tasks.contains_key(&cache_key) {
            return false;
        }

        let notify = Arc::new(Notify::new());
        let token = self.shutdown.child_token();
        tasks.insert(
            cache_key.clone(),
            RefreshTask {
                notify: notify.clone(),
                token: token.clone(),
            },
        );

        let fetcher = self.fetcher.clone();
        let table = self.table.clone();
        let floor = self.floor;

        tokio::spawn(async move {
            info!(service = %cache_key, "🔄 Refresh task started");
            loop {
                let cache_millis = table
                    .get(&cache_key)
                    .await
                    .map(|s| s.cache_millis)
                    .unwrap_or(0);
                let delay = refresh_interval(cache_millis, floor);

                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(delay) => {}
                    _ = notify.notified() => {
                        debug!(service = %cache_key, "Refresh triggered by invalidation");
                    }
                }

                tokio::select! {
                    _ = token.cancelled() => break,
                    result = fetcher.fetch(&key) => match result {
                        Ok(service) => debug!(
                            service = %cache_key,
                            hosts = service.hosts.len(),
                            "Service refreshed"
                        ),
                        Err(e) => warn!(
                            service = %cache_key,
                            error = %e,
                            "⚠️ Failed to refresh service, keeping last known snapshot"
                        ),
                    }
                }
            }
            info!(service = %cache_key, "🛑 Refresh task stopped");
        });

        true
    }

    /// 立即刷新一个服务键，未被跟踪时返回 `false`
    pub async fn invalidate(&self, cache_key: &str) -> bool {
        match self.tasks.lock().await.get(cache_key) {
            Some(task) => {
                task.notify.notify_one();
                true
            }
            None => {
                debug!(service = %cache_key, "Ignoring invalidation for untracked service");
                false
            }
        }
    }

    /// 停止跟踪服务键
    pub async fn untrack(&self, cache_key: &str) -> bool {
        match self.tasks.lock().await.remove(cache_key) {
            Some(task) => {
                task.token.cancel();
                true
            }
            None => false,
        }
    }

    /// 消费推送通道中的服务键，逐个触发立即刷新
    pub fn listen(self: &Arc<Self>, mut pushes: mpsc::Receiver<String>) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = scheduler.shutdown.cancelled() => break,
                    pushed = pushes.recv() => match pushed {
                        Some(cache_key) => {
                            scheduler.invalidate(&cache_key).await;
                        }
                        None => break,
                    }
                }
            }
            debug!("Push listener stopped");
        })
    }

    /// 正在跟踪的服务键
    pub async fn tracked_keys(&self) -> Vec<String> {
        self.tasks.lock().await.keys().cloned().collect()
    }

    /// 通知全部刷新任务退出，可以在同步上下文中调用
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// 是否已停止
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// 停止全部刷新任务
    pub async fn shutdown(&self) {
        self.cancel();
        self.tasks.lock().await.clear();
    }
}

//! 临时实例心跳
//!
//! 每个注册的临时实例一个心跳任务，注销或关闭客户端时停止

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::proxy::NamingProxy;
use crate::error::Result;

/// 心跳内容
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BeatInfo {
    pub ip: String,
    pub port: u16,
    pub weight: f64,
    pub service_name: String,
    pub cluster: String,
    pub metadata: HashMap<String, String>,
    pub scheduled: bool,
    /// 心跳间隔（毫秒）
    pub period: u64,
}

/// 心跳任务管理
pub struct BeatReactor {
    proxy: Arc<NamingProxy>,
    interval: Duration,
    beats: Mutex<HashMap<String, CancellationToken>>,
    shutdown: CancellationToken,
}

impl BeatReactor {
    /// 创建心跳管理器
    pub fn new(proxy: Arc<NamingProxy>, interval: Duration) -> Self {
        Self {
            proxy,
            interval,
            beats: Mutex::new(HashMap::new()),
            shutdown: CancellationToken::new(),
        }
    }

    /// 心跳任务的键：`group@@service#ip#port`
    pub fn beat_key(grouped_name: &str, ip: &str, port: u16) -> String {
        format!("{}#{}#{}", grouped_name, ip, port)
    }

    /// 开始为实例发送心跳，已存在的同名任务会被替换
    pub async fn add_beat(&self, grouped_name: &str, mut beat: BeatInfo) -> Result<()> {
        if self.shutdown.is_cancelled() {
            warn!(
                service = %grouped_name,
                ip = %beat.ip,
                port = beat.port,
                "Heartbeat reactor stopped, not scheduling beat"
            );
            return Ok(());
        }

        beat.period = self.interval.as_millis() as u64;
        beat.scheduled = true;
        let beat_json = serde_json::to_string(&beat)?;

        let key = Self::beat_key(grouped_name, &beat.ip, beat.port);
        let token = self.shutdown.child_token();

        {
            let mut beats = self.beats.lock().await;
            if let Some(old) = beats.insert(key.clone(), token.clone()) {
                old.cancel();
            }
        }

        let proxy = self.proxy.clone();
        let interval = self.interval;
        let grouped_name = grouped_name.to_string();

        tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!(beat = %key, "🛑 Heartbeat task stopped");
                        break;
                    }
                    _ = timer.tick() => {
                        match proxy.send_beat(&grouped_name, beat_json.clone()).await {
                            Ok(()) => debug!(beat = %key, "💓 Heartbeat sent"),
                            Err(e) => warn!(beat = %key, error = %e, "⚠️ Failed to send heartbeat"),
                        }
                    }
                }
            }
        });

        Ok(())
    }

    /// 停止实例心跳，返回是否存在该任务
    pub async fn remove_beat(&self, grouped_name: &str, ip: &str, port: u16) -> bool {
        let key = Self::beat_key(grouped_name, ip, port);
        match self.beats.lock().await.remove(&key) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// 正在运行的心跳任务数
    pub async fn active_count(&self) -> usize {
        self.beats.lock().await.len()
    }

    /// 通知全部心跳任务退出，可以在同步上下文中调用
    pub fn cancel(&self) {
        self.shutdown.cancel();
    }

    /// 是否已停止
    pub fn is_cancelled(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// 停止全部心跳
    pub async fn shutdown(&self) {
        self.cancel();
        self.beats.lock().await.clear();
    }
}

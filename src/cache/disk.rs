//! 服务快照磁盘存储
//!
//! 磁盘缓存只是尽力而为的持久化提示：读取失败、文件缺失、内容损坏都按未命中处理，
//! 从不向调用方传播解析错误。

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

use super::key::{PathStyle, encode_key};
use crate::error::{NamingError, Result};
use crate::model::Service;

/// 当前快照格式版本
pub const CACHE_FORMAT_VERSION: u32 = 1;

const TMP_SUFFIX: &str = ".tmp";

/// 磁盘文件内容
#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope {
    version: u32,
    key: String,
    service: Service,
}

/// 服务快照磁盘存储
#[derive(Debug)]
pub struct DiskStore {
    root: PathBuf,
    style: PathStyle,
    tmp_seq: AtomicU64,
}

impl DiskStore {
    /// 创建磁盘存储，目录不存在时自动创建
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::with_style(root, PathStyle::host()).await
    }

    /// 使用指定路径风格创建磁盘存储
    pub async fn with_style(root: impl Into<PathBuf>, style: PathStyle) -> Result<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self {
            root,
            style,
            tmp_seq: AtomicU64::new(0),
        })
    }

    /// 缓存根目录
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 某个缓存键对应的文件路径
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(encode_key(key, self.style))
    }

    /// 保存快照：先写临时文件再 rename，读者不会看到写了一半的文件
    pub async fn save(&self, key: &str, service: &Service) -> Result<()> {
        let envelope = CacheEnvelope {
            version: CACHE_FORMAT_VERSION,
            key: key.to_string(),
            service: service.clone(),
        };
        let content = serde_json::to_vec_pretty(&envelope)?;

        let target = self.path_for(key);
        let seq = self.tmp_seq.fetch_add(1, Ordering::Relaxed);
        let tmp = self.root.join(format!(
            "{}.{}.{}{}",
            encode_key(key, self.style),
            std::process::id(),
            seq,
            TMP_SUFFIX
        ));

        tokio::fs::create_dir_all(&self.root).await?;
        if let Err(e) = tokio::fs::write(&tmp, &content).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &target).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        debug!(service = %key, path = %target.display(), "Service snapshot saved to disk");
        Ok(())
    }

    /// 读取快照，任何失败都返回 `None`
    pub async fn load(&self, key: &str) -> Option<Service> {
        let path = self.path_for(key);
        match tokio::fs::try_exists(&path).await {
            Ok(true) => {}
            _ => {
                debug!(service = %key, "No cached snapshot on disk");
                return None;
            }
        }

        match read_entry(&path).await {
            Ok(envelope) if envelope.key == key => Some(envelope.service),
            Ok(envelope) => {
                // Windows 风格下 `a:b` 与 `a&&b` 编码到同一个文件
                warn!(
                    service = %key,
                    stored = %envelope.key,
                    path = %path.display(),
                    "Ignoring cache entry written for a different key"
                );
                None
            }
            Err(e) => {
                warn!(service = %key, path = %path.display(), error = %e, "Ignoring malformed cache entry");
                None
            }
        }
    }

    /// 读取目录下全部快照，用于启动时预热
    pub async fn load_all(&self) -> Vec<(String, Service)> {
        let mut entries = Vec::new();
        let mut dir = match tokio::fs::read_dir(&self.root).await {
            Ok(dir) => dir,
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "Failed to read cache directory");
                return entries;
            }
        };

        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(path = %self.root.display(), error = %e, "Failed to iterate cache directory");
                    break;
                }
            };

            let path = entry.path();
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            let is_tmp = path
                .file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(TMP_SUFFIX))
                .unwrap_or(true);
            if !is_file || is_tmp {
                continue;
            }

            match read_entry(&path).await {
                Ok(envelope) => entries.push((envelope.key, envelope.service)),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping malformed cache entry");
                }
            }
        }

        debug!(path = %self.root.display(), count = entries.len(), "Loaded cached snapshots");
        entries
    }
}

async fn read_entry(path: &Path) -> Result<CacheEnvelope> {
    let content = tokio::fs::read(path)
        .await
        .map_err(|e| NamingError::MalformedCacheEntry(e.to_string()))?;
    let envelope: CacheEnvelope = serde_json::from_slice(&content)
        .map_err(|e| NamingError::MalformedCacheEntry(e.to_string()))?;
    if envelope.version != CACHE_FORMAT_VERSION {
        return Err(NamingError::MalformedCacheEntry(format!(
            "unsupported cache format version {}",
            envelope.version
        )));
    }
    Ok(envelope)
}

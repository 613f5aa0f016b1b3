//! 注册中心节点轮询游标

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::ServerConfig;
use crate::error::{NamingError, Result};

/// 注册中心节点轮询游标
///
/// 节点列表在构造后不可变；所有调用共享同一个游标，并发下近似轮询即可
#[derive(Debug)]
pub struct EndpointCursor {
    servers: Vec<ServerConfig>,
    index: AtomicUsize,
}

impl EndpointCursor {
    /// 创建游标，节点列表不能为空
    pub fn new(servers: Vec<ServerConfig>) -> Result<Self> {
        if servers.is_empty() {
            return Err(NamingError::configuration("at least one server is required"));
        }
        Ok(Self {
            servers,
            index: AtomicUsize::new(0),
        })
    }

    /// 取下一个节点
    pub fn next(&self) -> &ServerConfig {
        let index = self.index.fetch_add(1, Ordering::Relaxed);
        &self.servers[index % self.servers.len()]
    }

    /// 节点数
    pub fn len(&self) -> usize {
        self.servers.len()
    }

    /// 是否没有节点（构造时已保证不会发生）
    pub fn is_empty(&self) -> bool {
        self.servers.is_empty()
    }

    /// 全部节点
    pub fn servers(&self) -> &[ServerConfig] {
        &self.servers
    }
}

//! 重试策略模块
//!
//! 注册中心调用失败后换下一个节点重试，尝试次数由策略决定

pub mod fixed;

pub use fixed::FixedRetryPolicy;

use crate::error::NamingError;
use std::time::Duration;

/// 重试策略 trait
pub trait RetryPolicy: Send + Sync {
    /// 第 `attempt` 次尝试（从 1 开始）失败后是否继续
    fn should_retry(&self, attempt: usize, error: &NamingError) -> bool;

    /// 下一次尝试前的等待时间
    fn backoff_duration(&self, attempt: usize) -> Duration;

    /// 最大尝试次数
    fn max_attempts(&self) -> usize;

    /// 结合注册中心节点数得到一次调用的尝试预算，至少为 1
    fn attempt_budget(&self, endpoint_count: usize) -> usize {
        let _ = endpoint_count;
        self.max_attempts().max(1)
    }
}

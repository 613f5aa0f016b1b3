use super::RetryPolicy;
use crate::error::NamingError;
use std::time::Duration;

/// 默认最大尝试次数
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// 固定延迟重试策略
#[derive(Debug, Clone)]
pub struct FixedRetryPolicy {
    max_attempts: usize,
    delay: Duration,
    cap_by_endpoints: bool,
}

impl FixedRetryPolicy {
    pub fn new(max_attempts: usize, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            cap_by_endpoints: true,
        }
    }

    /// 尝试次数是否不超过节点数
    pub fn with_cap_by_endpoints(mut self, cap: bool) -> Self {
        self.cap_by_endpoints = cap;
        self
    }
}

impl Default for FixedRetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::ZERO)
    }
}

impl RetryPolicy for FixedRetryPolicy {
    fn should_retry(&self, attempt: usize, error: &NamingError) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }

        // 只对可重试的错误进行重试
        error.is_retryable()
    }

    fn backoff_duration(&self, _attempt: usize) -> Duration {
        self.delay
    }

    fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn attempt_budget(&self, endpoint_count: usize) -> usize {
        let budget = if self.cap_by_endpoints {
            self.max_attempts.min(endpoint_count)
        } else {
            self.max_attempts
        };
        budget.max(1)
    }
}

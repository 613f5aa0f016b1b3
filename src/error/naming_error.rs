//! 命名客户端统一错误类型

use super::code::ErrorCode;
use thiserror::Error;

/// 命名客户端统一错误类型
///
/// 需要 `Clone`：同一个单飞（singleflight）拉取的结果会分发给所有合并的调用方
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NamingError {
    /// 单个注册中心节点的一次请求失败（网络错误或超时）
    #[error("传输错误 [{endpoint}]: {reason}")]
    Transport {
        endpoint: String,
        reason: String,
        timed_out: bool,
    },

    /// 注册中心返回了非 2xx 状态码，或返回体不是预期的 `ok`
    #[error("注册中心返回错误 [{endpoint}] 状态码 {status}: {body}")]
    RegistryStatus {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// 所有重试次数耗尽
    #[error("注册中心不可用（共尝试 {attempts} 次）: {last_error}")]
    RegistryUnavailable {
        attempts: usize,
        last_error: Box<NamingError>,
    },

    /// 没有可选的实例
    #[error("服务 {service} 没有可用实例: {reason}")]
    NoHealthyInstance { service: String, reason: String },

    /// 磁盘缓存读取或解析失败（只在磁盘存储内部使用，对外表现为未命中）
    #[error("缓存条目损坏: {0}")]
    MalformedCacheEntry(String),

    /// 参数错误
    #[error("参数错误: {0}")]
    InvalidParameter(String),

    /// 配置错误
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 序列化或反序列化错误
    #[error("序列化错误: {0}")]
    Serialization(String),

    /// IO 错误
    #[error("IO 错误: {0}")]
    Io(String),
}

impl NamingError {
    /// 创建传输错误
    pub fn transport(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        NamingError::Transport {
            endpoint: endpoint.into(),
            reason: reason.into(),
            timed_out: false,
        }
    }

    /// 创建请求超时错误
    pub fn timeout(endpoint: impl Into<String>, reason: impl Into<String>) -> Self {
        NamingError::Transport {
            endpoint: endpoint.into(),
            reason: reason.into(),
            timed_out: true,
        }
    }

    /// 创建无可用实例错误
    pub fn no_healthy_instance(service: impl Into<String>, reason: impl Into<String>) -> Self {
        NamingError::NoHealthyInstance {
            service: service.into(),
            reason: reason.into(),
        }
    }

    /// 创建参数错误
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        NamingError::InvalidParameter(msg.into())
    }

    /// 创建配置错误
    pub fn configuration(msg: impl Into<String>) -> Self {
        NamingError::Configuration(msg.into())
    }

    /// 创建序列化错误
    pub fn serialization(msg: impl Into<String>) -> Self {
        NamingError::Serialization(msg.into())
    }

    /// 获取错误代码
    pub fn code(&self) -> ErrorCode {
        match self {
            NamingError::Transport { timed_out: true, .. } => ErrorCode::RequestTimeout,
            NamingError::Transport { .. } => ErrorCode::TransportFailed,
            NamingError::RegistryStatus { status: 401, .. }
            | NamingError::RegistryStatus { status: 403, .. } => ErrorCode::AuthorizationFailed,
            NamingError::RegistryStatus { .. } => ErrorCode::RegistryStatusError,
            NamingError::RegistryUnavailable { .. } => ErrorCode::RegistryUnavailable,
            NamingError::NoHealthyInstance { .. } => ErrorCode::NoHealthyInstance,
            NamingError::MalformedCacheEntry(_) => ErrorCode::MalformedCacheEntry,
            NamingError::InvalidParameter(_) => ErrorCode::InvalidParameter,
            NamingError::Configuration(_) => ErrorCode::ConfigurationError,
            NamingError::Serialization(_) => ErrorCode::SerializationError,
            NamingError::Io(_) => ErrorCode::CacheIoError,
        }
    }

    /// 判断是否可以换一个注册中心节点重试
    pub fn is_retryable(&self) -> bool {
        self.code().is_retryable()
    }

    /// 对于 `RegistryUnavailable`，返回最后一次尝试的错误
    pub fn last_attempt_error(&self) -> Option<&NamingError> {
        match self {
            NamingError::RegistryUnavailable { last_error, .. } => Some(last_error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for NamingError {
    fn from(err: std::io::Error) -> Self {
        NamingError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for NamingError {
    fn from(err: serde_json::Error) -> Self {
        NamingError::Serialization(err.to_string())
    }
}

/// 结果类型别名
pub type Result<T> = std::result::Result<T, NamingError>;

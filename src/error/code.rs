//! 错误代码和错误类别定义
//!
//! 错误代码按类别分组，每个类别占用1000个代码范围：
//! - 1000-1999: 传输相关错误（单个注册中心节点的一次请求）
//! - 2000-2999: 注册中心相关错误
//! - 3000-3999: 实例选择相关错误
//! - 4000-4999: 本地缓存相关错误
//! - 8000-8999: 序列化相关错误
//! - 9000-9999: 通用错误

use serde::{Deserialize, Serialize};
use std::fmt;

/// 错误代码枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u32)]
pub enum ErrorCode {
    // ============================================================
    // 传输相关错误 (1000-1999)
    // ============================================================
    TransportFailed = 1000,
    RequestTimeout = 1001,

    // ============================================================
    // 注册中心相关错误 (2000-2999)
    // ============================================================
    RegistryStatusError = 2000,
    RegistryUnavailable = 2001,
    AuthorizationFailed = 2002,

    // ============================================================
    // 实例选择相关错误 (3000-3999)
    // ============================================================
    NoHealthyInstance = 3000,

    // ============================================================
    // 本地缓存相关错误 (4000-4999)
    // ============================================================
    MalformedCacheEntry = 4000,
    CacheIoError = 4001,

    // ============================================================
    // 序列化相关错误 (8000-8999)
    // ============================================================
    SerializationError = 8000,

    // ============================================================
    // 通用错误 (9000-9999)
    // ============================================================
    InvalidParameter = 9001,
    ConfigurationError = 9002,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ErrorCode {
    /// 获取错误代码的数字值
    #[inline]
    pub fn as_u32(&self) -> u32 {
        *self as u32
    }

    /// 从数字值创建错误代码
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1000 => Some(ErrorCode::TransportFailed),
            1001 => Some(ErrorCode::RequestTimeout),
            2000 => Some(ErrorCode::RegistryStatusError),
            2001 => Some(ErrorCode::RegistryUnavailable),
            2002 => Some(ErrorCode::AuthorizationFailed),
            3000 => Some(ErrorCode::NoHealthyInstance),
            4000 => Some(ErrorCode::MalformedCacheEntry),
            4001 => Some(ErrorCode::CacheIoError),
            8000 => Some(ErrorCode::SerializationError),
            9001 => Some(ErrorCode::InvalidParameter),
            9002 => Some(ErrorCode::ConfigurationError),
            _ => None,
        }
    }

    /// 获取错误代码的英文标识符
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::TransportFailed => "TRANSPORT_FAILED",
            ErrorCode::RequestTimeout => "REQUEST_TIMEOUT",
            ErrorCode::RegistryStatusError => "REGISTRY_STATUS_ERROR",
            ErrorCode::RegistryUnavailable => "REGISTRY_UNAVAILABLE",
            ErrorCode::AuthorizationFailed => "AUTHORIZATION_FAILED",
            ErrorCode::NoHealthyInstance => "NO_HEALTHY_INSTANCE",
            ErrorCode::MalformedCacheEntry => "MALFORMED_CACHE_ENTRY",
            ErrorCode::CacheIoError => "CACHE_IO_ERROR",
            ErrorCode::SerializationError => "SERIALIZATION_ERROR",
            ErrorCode::InvalidParameter => "INVALID_PARAMETER",
            ErrorCode::ConfigurationError => "CONFIGURATION_ERROR",
        }
    }

    /// 获取错误代码的类别
    pub fn category(&self) -> ErrorCategory {
        match self.as_u32() {
            1000..=1999 => ErrorCategory::Transport,
            2000..=2999 => ErrorCategory::Registry,
            3000..=3999 => ErrorCategory::Selection,
            4000..=4999 => ErrorCategory::Cache,
            8000..=8999 => ErrorCategory::Serialization,
            _ => ErrorCategory::General,
        }
    }

    /// 判断是否可以换一个注册中心节点重试
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorCode::TransportFailed
                | ErrorCode::RequestTimeout
                | ErrorCode::RegistryStatusError
                | ErrorCode::AuthorizationFailed
        )
    }
}

/// 错误类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    Transport,
    Registry,
    Selection,
    Cache,
    Serialization,
    General,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Transport => write!(f, "TRANSPORT"),
            ErrorCategory::Registry => write!(f, "REGISTRY"),
            ErrorCategory::Selection => write!(f, "SELECTION"),
            ErrorCategory::Cache => write!(f, "CACHE"),
            ErrorCategory::Serialization => write!(f, "SERIALIZATION"),
            ErrorCategory::General => write!(f, "GENERAL"),
        }
    }
}

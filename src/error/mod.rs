//! 命名客户端错误处理模块
//!
//! 提供统一的错误类型和错误代码分类：
//! - 传输错误在注册中心节点之间透明重试
//! - 语义错误（无可用实例、注册中心不可用）直接返回给调用方

pub mod code;
pub mod naming_error;

pub use code::{ErrorCategory, ErrorCode};
pub use naming_error::{NamingError, Result};

/// 外部协作方（例如请求执行器）使用的结果类型
pub type InfraResult<T> = anyhow::Result<T>;

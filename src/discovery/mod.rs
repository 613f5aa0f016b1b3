//! 服务发现模块
//!
//! 内存表、实例选择、后台刷新和对外的命名客户端

pub mod client;
pub mod scheduler;
pub mod selector;
pub mod table;

pub use client::NamingClient;
pub use scheduler::{DEFAULT_REFRESH_INTERVAL, RefreshScheduler, refresh_interval};
pub use selector::InstanceSelector;
pub use table::InstanceTable;

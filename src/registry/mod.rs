//! 注册中心访问模块
//!
//! 请求执行器、节点轮询、命名接口代理、拉取器和心跳

pub mod beat;
pub mod endpoint;
pub mod executor;
pub mod fetcher;
pub mod proxy;

pub use beat::{BeatInfo, BeatReactor};
pub use endpoint::EndpointCursor;
pub use executor::{RegistryRequest, RegistryResponse, ReqwestExecutor, RequestExecutor};
pub use fetcher::RegistryFetcher;
pub use proxy::NamingProxy;

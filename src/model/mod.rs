//! 数据模型：实例、服务快照和调用参数

pub mod instance;
pub mod param;
pub mod service;

pub use instance::Instance;
pub use param::{
    DeregisterInstanceParam, GetAllServiceInfoParam, GetServiceParam, RegisterInstanceParam,
    SelectAllInstancesParam, SelectInstancesParam, SelectOneHealthInstanceParam,
    UpdateInstanceParam,
};
pub use service::{Service, ServiceKey, ServiceList};

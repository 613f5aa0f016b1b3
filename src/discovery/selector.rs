//! 实例选择模块
//!
//! 单实例选择只考虑启用、健康且权重大于 0 的实例，按权重比例随机选取；
//! 列表选择按健康状态过滤。两者在没有匹配实例时都返回错误，不返回空结果。

use rand::Rng;
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use std::sync::Mutex;

use crate::error::{NamingError, Result};
use crate::model::{Instance, Service};

/// 实例选择器
///
/// 默认使用线程本地随机数；`seeded` 构造的选择器使用固定种子，便于复现
#[derive(Default)]
pub struct InstanceSelector {
    rng: Option<Mutex<StdRng>>,
}

impl InstanceSelector {
    /// 创建使用线程本地随机数的选择器
    pub fn new() -> Self {
        Self { rng: None }
    }

    /// 创建使用固定种子的选择器
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Some(Mutex::new(StdRng::seed_from_u64(seed))),
        }
    }

    /// 按权重随机选择一个可用实例
    pub fn select_one(&self, service: &Service) -> Result<Instance> {
        match &self.rng {
            Some(rng) => {
                let mut rng = rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                select_one_with(service, &mut *rng)
            }
            None => select_one_with(service, &mut rand::thread_rng()),
        }
    }

    /// 按健康状态选择实例列表
    pub fn select_many(&self, service: &Service, healthy_only: bool) -> Result<Vec<Instance>> {
        select_many(service, healthy_only)
    }

    /// 返回全部实例
    pub fn select_all(&self, service: &Service) -> Result<Vec<Instance>> {
        select_all(service)
    }
}

/// 使用给定随机数发生器按权重选择一个可用实例
///
/// 实例 i 被选中的概率为 `weight(i) / Σ weight(j)`（j 取遍可用实例）
pub fn select_one_with<R: Rng + ?Sized>(service: &Service, rng: &mut R) -> Result<Instance> {
    if service.hosts.is_empty() {
        return Err(NamingError::no_healthy_instance(
            &service.name,
            "instance list is empty",
        ));
    }

    let candidates: Vec<&Instance> = service.hosts.iter().filter(|h| h.is_selectable()).collect();
    if candidates.is_empty() {
        return Err(NamingError::no_healthy_instance(
            &service.name,
            "no instance is enabled, healthy and weighted",
        ));
    }

    let index = WeightedIndex::new(candidates.iter().map(|h| h.weight))
        .map_err(|e| NamingError::no_healthy_instance(&service.name, e.to_string()))?;
    Ok(candidates[index.sample(rng)].clone())
}

/// `healthy_only = true` 返回所有健康实例（不看启用状态和权重），
/// `false` 返回所有不健康实例
pub fn select_many(service: &Service, healthy_only: bool) -> Result<Vec<Instance>> {
    if service.hosts.is_empty() {
        return Err(NamingError::no_healthy_instance(
            &service.name,
            "instance list is empty",
        ));
    }

    let matched: Vec<Instance> = service
        .hosts
        .iter()
        .filter(|h| h.healthy == healthy_only)
        .cloned()
        .collect();

    if matched.is_empty() {
        let reason = if healthy_only {
            "no healthy instance"
        } else {
            "no unhealthy instance"
        };
        return Err(NamingError::no_healthy_instance(&service.name, reason));
    }
    Ok(matched)
}

/// 返回全部实例，实例列表为空时报错
pub fn select_all(service: &Service) -> Result<Vec<Instance>> {
    if service.hosts.is_empty() {
        return Err(NamingError::no_healthy_instance(
            &service.name,
            "instance list is empty",
        ));
    }
    Ok(service.hosts.clone())
}

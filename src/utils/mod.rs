//! 工具函数模块

/// 未指定分组时使用的默认分组
pub const DEFAULT_GROUP: &str = "DEFAULT_GROUP";

/// 服务键各字段之间的分隔符
pub const SERVICE_INFO_SPLITER: &str = "@@";

/// 组合分组名和服务名
///
/// # 示例
/// ```rust
/// use flare_naming_client::utils::get_grouped_name;
///
/// assert_eq!(get_grouped_name("DEMO", ""), "DEFAULT_GROUP@@DEMO");
/// assert_eq!(get_grouped_name("DEMO2", "test_group"), "test_group@@DEMO2");
/// ```
pub fn get_grouped_name(service_name: &str, group_name: &str) -> String {
    let group = if group_name.is_empty() {
        DEFAULT_GROUP
    } else {
        group_name
    };
    format!("{}{}{}", group, SERVICE_INFO_SPLITER, service_name)
}

/// 缓存键：`group@@service`，指定集群时追加 `@@clusters`
pub fn get_service_cache_key(grouped_name: &str, clusters: &str) -> String {
    if clusters.is_empty() {
        grouped_name.to_string()
    } else {
        format!("{}{}{}", grouped_name, SERVICE_INFO_SPLITER, clusters)
    }
}

/// 集群列表拼接为逗号分隔字符串
pub fn join_clusters(clusters: &[String]) -> String {
    clusters.join(",")
}

/// 当前 epoch 毫秒
pub fn now_millis() -> u64 {
    chrono::Utc::now().timestamp_millis().max(0) as u64
}

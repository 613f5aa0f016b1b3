//! 缓存键编码测试

use flare_naming_client::cache::{PathStyle, encode_key, get_file_name};
use flare_naming_client::model::ServiceKey;
use flare_naming_client::utils::{get_grouped_name, get_service_cache_key};

const KEY: &str = "nacos@@providers:org.example.UserProvider:hangzhou";

#[test]
fn test_windows_style_escapes_colon() {
    assert_eq!(
        get_file_name(KEY, "tmp", PathStyle::Windows),
        "tmp\\nacos@@providers&&org.example.UserProvider&&hangzhou"
    );
}

#[test]
fn test_posix_style_keeps_colon() {
    assert_eq!(
        get_file_name(KEY, "tmp", PathStyle::Posix),
        "tmp/nacos@@providers:org.example.UserProvider:hangzhou"
    );
}

#[test]
fn test_encoding_is_deterministic() {
    for style in [PathStyle::Windows, PathStyle::Posix] {
        assert_eq!(encode_key(KEY, style), encode_key(KEY, style));
    }
    assert_ne!(
        encode_key(KEY, PathStyle::Windows),
        encode_key(KEY, PathStyle::Posix)
    );
}

#[test]
fn test_key_without_colon_is_identical_on_both_styles() {
    let key = "DEFAULT_GROUP@@DEMO";
    assert_eq!(encode_key(key, PathStyle::Windows), key);
    assert_eq!(encode_key(key, PathStyle::Posix), key);
}

#[test]
fn test_root_with_trailing_separator() {
    assert_eq!(
        get_file_name("a:b", "cache/", PathStyle::Posix),
        "cache/a:b"
    );
    assert_eq!(
        get_file_name("a:b", "cache\\", PathStyle::Windows),
        "cache\\a&&b"
    );
}

#[test]
fn test_service_key_composition() {
    assert_eq!(get_grouped_name("DEMO", ""), "DEFAULT_GROUP@@DEMO");
    assert_eq!(get_grouped_name("DEMO2", "test_group"), "test_group@@DEMO2");

    let key = ServiceKey::new("DEMO", "", &[]);
    assert_eq!(key.cache_key(), "DEFAULT_GROUP@@DEMO");

    let key = ServiceKey::new("DEMO", "g", &["a".to_string(), "b".to_string()]);
    assert_eq!(key.clusters, "a,b");
    assert_eq!(key.cache_key(), "g@@DEMO@@a,b");
    assert_eq!(get_service_cache_key("g@@DEMO", ""), "g@@DEMO");
}

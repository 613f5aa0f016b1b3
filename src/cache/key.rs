//! 缓存键编码
//!
//! 缓存键中允许出现 `:`（例如 `providers:org.example.UserProvider:hangzhou`），
//! 但 Windows 路径不允许，因此只在 Windows 风格下把 `:` 替换为 `&&`。
//! 编码是单向的：缓存文件名不会被解码回缓存键。

/// 路径风格
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathStyle {
    Windows,
    Posix,
}

impl PathStyle {
    /// 当前宿主系统的路径风格
    pub fn host() -> Self {
        if cfg!(windows) {
            PathStyle::Windows
        } else {
            PathStyle::Posix
        }
    }

    /// 路径分隔符
    pub fn separator(&self) -> char {
        match self {
            PathStyle::Windows => '\\',
            PathStyle::Posix => '/',
        }
    }
}

/// 把缓存键编码为文件名
pub fn encode_key(key: &str, style: PathStyle) -> String {
    match style {
        PathStyle::Windows => key.replace(':', "&&"),
        PathStyle::Posix => key.to_string(),
    }
}

/// `<cache_root><sep><encoded_key>`
pub fn get_file_name(key: &str, cache_root: &str, style: PathStyle) -> String {
    let sep = style.separator();
    let encoded = encode_key(key, style);
    if cache_root.is_empty() {
        encoded
    } else if cache_root.ends_with(sep) {
        format!("{}{}", cache_root, encoded)
    } else {
        format!("{}{}{}", cache_root, sep, encoded)
    }
}

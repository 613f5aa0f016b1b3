//! 本地缓存：缓存键编码和磁盘快照存储

pub mod disk;
pub mod key;

pub use disk::{CACHE_FORMAT_VERSION, DiskStore};
pub use key::{PathStyle, encode_key, get_file_name};

//! 后端存储抽象
//!
//! 每个逻辑操作从 [`CacheStore`] 取一个连接，操作结束时连接随之释放。

pub mod memory;
pub mod redis;

use std::time::Duration;

use async_trait::async_trait;

use crate::cache::codec::FieldMap;
use crate::cache::error::CacheError;

pub use self::memory::MemoryStore;
pub use self::redis::RedisStore;

/// 可共享的存储句柄（连接池）
#[async_trait]
pub trait CacheStore: Clone + Send + Sync + 'static {
    type Connection: CacheConnection;

    async fn connection(&self) -> Result<Self::Connection, CacheError>;
}

/// 单个连接上可用的命令
#[async_trait]
pub trait CacheConnection: Send {
    /// GET，键不存在时返回 `None`
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError>;

    /// SET ... EX，总是覆盖
    async fn set_ex(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError>;

    /// EXPIRE，键不存在时返回 `false`
    async fn expire(&mut self, key: &str, ttl: Duration) -> Result<bool, CacheError>;

    /// DEL，返回实际删除的键数
    async fn del(&mut self, keys: &[String]) -> Result<usize, CacheError>;

    /// 原子地用 `fields` 整体替换哈希并设置过期时间
    async fn replace_hash(
        &mut self,
        key: &str,
        fields: &FieldMap,
        ttl: Duration,
    ) -> Result<(), CacheError>;

    /// HGETALL，键不存在时返回空表
    async fn hgetall(&mut self, key: &str) -> Result<FieldMap, CacheError>;

    /// RPUSH，返回列表新长度
    async fn rpush(&mut self, key: &str, value: &str) -> Result<usize, CacheError>;

    /// LRANGE，`stop` 为闭区间
    async fn lrange(&mut self, key: &str, start: isize, stop: isize)
    -> Result<Vec<String>, CacheError>;
}

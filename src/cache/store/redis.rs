use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as PoolSettings, Connection, Pool, PoolConfig, Runtime};
use redis::AsyncCommands;
use tracing::{info, instrument};

use super::{CacheConnection, CacheStore};
use crate::cache::codec::FieldMap;
use crate::cache::error::CacheError;

/// 连接池配置错误
#[derive(Debug, thiserror::Error)]
#[error("failed to create redis pool: {0}")]
pub struct CreatePoolError(#[from] deadpool_redis::CreatePoolError);

/// 基于 deadpool 连接池的 Redis 存储
#[derive(Clone)]
pub struct RedisStore {
    pool: Pool,
}

impl RedisStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// 按 URL 创建连接池，连接在首次使用时才建立
    #[instrument(skip_all, name = "connect-redis")]
    pub fn connect(url: &str, max_size: usize) -> Result<Self, CreatePoolError> {
        let mut settings = PoolSettings::from_url(url);
        settings.pool = Some(PoolConfig::new(max_size));

        let pool = settings.create_pool(Some(Runtime::Tokio1))?;
        info!(redis.pool_size = max_size, "redis pool created");

        Ok(Self::new(pool))
    }
}

#[async_trait]
impl CacheStore for RedisStore {
    type Connection = RedisConnection;

    async fn connection(&self) -> Result<RedisConnection, CacheError> {
        Ok(RedisConnection(self.pool.get().await?))
    }
}

/// 从池中借出的连接，drop 时归还
pub struct RedisConnection(Connection);

#[async_trait]
impl CacheConnection for RedisConnection {
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.0.get(key).await?)
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let _: () = self.0.set_ex(key, value, ttl.as_secs()).await?;
        Ok(())
    }

    async fn expire(&mut self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        Ok(self.0.expire(key, ttl.as_secs() as i64).await?)
    }

    async fn del(&mut self, keys: &[String]) -> Result<usize, CacheError> {
        if keys.is_empty() {
            return Ok(0);
        }
        Ok(self.0.del(keys.to_vec()).await?)
    }

    async fn replace_hash(
        &mut self,
        key: &str,
        fields: &FieldMap,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut pipe = redis::pipe();
        pipe.atomic().del(key).ignore();

        // 空哈希在 Redis 中等同于不存在
        if !fields.is_empty() {
            let items: Vec<(&str, &str)> = fields
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str()))
                .collect();
            pipe.hset_multiple(key, &items)
                .ignore()
                .expire(key, ttl.as_secs() as i64)
                .ignore();
        }

        let _: () = pipe.query_async(&mut self.0).await?;
        Ok(())
    }

    async fn hgetall(&mut self, key: &str) -> Result<FieldMap, CacheError> {
        Ok(self.0.hgetall(key).await?)
    }

    async fn rpush(&mut self, key: &str, value: &str) -> Result<usize, CacheError> {
        Ok(self.0.rpush(key, value).await?)
    }

    async fn lrange(
        &mut self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, CacheError> {
        Ok(self.0.lrange(key, start, stop).await?)
    }
}

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use redis::{ErrorKind, RedisError};
use tokio::time::Instant;

use super::{CacheConnection, CacheStore};
use crate::cache::codec::FieldMap;
use crate::cache::error::CacheError;

#[derive(Debug, Clone)]
enum Value {
    Str(String),
    Hash(FieldMap),
    List(Vec<String>),
}

#[derive(Debug, Clone)]
struct Entry {
    value: Value,
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| at > now)
    }
}

#[derive(Default)]
struct Shared {
    entries: Mutex<HashMap<String, Entry>>,
    offline: AtomicBool,
}

/// 进程内的存储实现，按 Redis 的语义处理过期时间
///
/// 过期时间基于 `tokio::time::Instant`，测试中可以暂停并推进时钟。
#[derive(Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 模拟存储不可达：之后所有连接请求都会失败
    pub fn set_offline(&self, offline: bool) {
        self.shared.offline.store(offline, Ordering::SeqCst);
    }

    /// 键是否存在且未过期
    pub fn contains_key(&self, key: &str) -> bool {
        let now = Instant::now();
        lock(&self.shared)
            .get(key)
            .is_some_and(|entry| entry.is_live(now))
    }

    /// 剩余存活时间，未设置过期或键不存在时返回 `None`
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        lock(&self.shared)
            .get(key)
            .filter(|entry| entry.is_live(now))
            .and_then(|entry| entry.expires_at)
            .map(|at| at - now)
    }

    /// 直接写入一个字符串值，用于构造异常数据
    pub fn insert_raw(&self, key: &str, value: &str) {
        lock(&self.shared).insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: None,
            },
        );
    }
}

fn lock(shared: &Shared) -> MutexGuard<'_, HashMap<String, Entry>> {
    shared
        .entries
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn wrong_type() -> CacheError {
    CacheError::Redis(RedisError::from((
        ErrorKind::TypeError,
        "WRONGTYPE Operation against a key holding the wrong kind of value",
    )))
}

#[async_trait]
impl CacheStore for MemoryStore {
    type Connection = MemoryConnection;

    async fn connection(&self) -> Result<MemoryConnection, CacheError> {
        if self.shared.offline.load(Ordering::SeqCst) {
            return Err(CacheError::Redis(RedisError::from((
                ErrorKind::IoError,
                "memory store is offline",
            ))));
        }
        Ok(MemoryConnection {
            shared: Arc::clone(&self.shared),
        })
    }
}

pub struct MemoryConnection {
    shared: Arc<Shared>,
}

impl MemoryConnection {
    /// 取出未过期的条目，顺带清理已过期的
    fn with_live<R>(
        &self,
        key: &str,
        f: impl FnOnce(Option<&mut Entry>) -> R,
    ) -> R {
        let now = Instant::now();
        let mut entries = lock(&self.shared);
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }
        f(entries.get_mut(key))
    }
}

#[async_trait]
impl CacheConnection for MemoryConnection {
    async fn get(&mut self, key: &str) -> Result<Option<String>, CacheError> {
        self.with_live(key, |entry| match entry {
            None => Ok(None),
            Some(Entry {
                value: Value::Str(s),
                ..
            }) => Ok(Some(s.clone())),
            Some(_) => Err(wrong_type()),
        })
    }

    async fn set_ex(&mut self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        lock(&self.shared).insert(
            key.to_string(),
            Entry {
                value: Value::Str(value.to_string()),
                expires_at: Some(Instant::now() + ttl),
            },
        );
        Ok(())
    }

    async fn expire(&mut self, key: &str, ttl: Duration) -> Result<bool, CacheError> {
        Ok(self.with_live(key, |entry| match entry {
            Some(entry) => {
                entry.expires_at = Some(Instant::now() + ttl);
                true
            }
            None => false,
        }))
    }

    async fn del(&mut self, keys: &[String]) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = lock(&self.shared);
        let removed = keys
            .iter()
            .filter_map(|key| entries.remove(key))
            .filter(|entry| entry.is_live(now))
            .count();
        Ok(removed)
    }

    async fn replace_hash(
        &mut self,
        key: &str,
        fields: &FieldMap,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut entries = lock(&self.shared);
        entries.remove(key);
        if !fields.is_empty() {
            entries.insert(
                key.to_string(),
                Entry {
                    value: Value::Hash(fields.clone()),
                    expires_at: Some(Instant::now() + ttl),
                },
            );
        }
        Ok(())
    }

    async fn hgetall(&mut self, key: &str) -> Result<FieldMap, CacheError> {
        self.with_live(key, |entry| match entry {
            None => Ok(FieldMap::new()),
            Some(Entry {
                value: Value::Hash(map),
                ..
            }) => Ok(map.clone()),
            Some(_) => Err(wrong_type()),
        })
    }

    async fn rpush(&mut self, key: &str, value: &str) -> Result<usize, CacheError> {
        let now = Instant::now();
        let mut entries = lock(&self.shared);
        if entries.get(key).is_some_and(|entry| !entry.is_live(now)) {
            entries.remove(key);
        }

        let entry = entries.entry(key.to_string()).or_insert_with(|| Entry {
            value: Value::List(Vec::new()),
            expires_at: None,
        });
        match &mut entry.value {
            Value::List(items) => {
                items.push(value.to_string());
                Ok(items.len())
            }
            _ => Err(wrong_type()),
        }
    }

    async fn lrange(
        &mut self,
        key: &str,
        start: isize,
        stop: isize,
    ) -> Result<Vec<String>, CacheError> {
        self.with_live(key, |entry| match entry {
            None => Ok(Vec::new()),
            Some(Entry {
                value: Value::List(items),
                ..
            }) => Ok(slice_range(items, start, stop)),
            Some(_) => Err(wrong_type()),
        })
    }
}

/// LRANGE 的下标规则：负数从尾部计数，`stop` 为闭区间，越界自动截断
fn slice_range(items: &[String], start: isize, stop: isize) -> Vec<String> {
    let len = items.len() as isize;
    let start = if start < 0 { (len + start).max(0) } else { start };
    let stop = if stop < 0 { len + stop } else { stop.min(len - 1) };

    if start > stop || start >= len {
        return Vec::new();
    }
    items[start as usize..=stop as usize].to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn lrange_follows_redis_index_rules() {
        let items = list(&["a", "b", "c", "d"]);

        assert_eq!(slice_range(&items, 0, 1), list(&["a", "b"]));
        assert_eq!(slice_range(&items, 1, 100), list(&["b", "c", "d"]));
        assert_eq!(slice_range(&items, 0, -1), items);
        assert_eq!(slice_range(&items, -2, -1), list(&["c", "d"]));
        assert!(slice_range(&items, 3, 1).is_empty());
        assert!(slice_range(&items, 10, 20).is_empty());
        assert!(slice_range(&[], 0, -1).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn entries_expire_on_the_tokio_clock() {
        let store = MemoryStore::new();
        let mut conn = store.connection().await.unwrap();

        conn.set_ex("k", "v", Duration::from_secs(10)).await.unwrap();
        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(conn.get("k").await.unwrap().as_deref(), Some("v"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(conn.get("k").await.unwrap(), None);
        assert!(!conn.expire("k", Duration::from_secs(10)).await.unwrap());
    }

    #[tokio::test]
    async fn replace_hash_drops_previous_fields() {
        let store = MemoryStore::new();
        let mut conn = store.connection().await.unwrap();
        let ttl = Duration::from_secs(60);

        let first: FieldMap = [("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
            .into_iter()
            .collect();
        let second: FieldMap = [("A".to_string(), "3".to_string())].into_iter().collect();

        conn.replace_hash("h", &first, ttl).await.unwrap();
        conn.replace_hash("h", &second, ttl).await.unwrap();

        assert_eq!(conn.hgetall("h").await.unwrap(), second);
        assert!(store.ttl("h").is_some());
    }

    #[tokio::test]
    async fn type_mismatch_is_reported_like_redis() {
        let store = MemoryStore::new();
        let mut conn = store.connection().await.unwrap();

        conn.rpush("l", "1").await.unwrap();
        assert!(matches!(conn.get("l").await, Err(CacheError::Redis(_))));
        assert!(matches!(conn.hgetall("l").await, Err(CacheError::Redis(_))));
    }

    #[tokio::test]
    async fn offline_store_refuses_connections() {
        let store = MemoryStore::new();
        store.set_offline(true);

        let err = store.connection().await.err().unwrap();
        assert!(err.is_connectivity());

        store.set_offline(false);
        assert!(store.connection().await.is_ok());
    }
}

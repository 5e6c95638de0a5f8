use tracing::{debug, warn};

use super::token::TokenCacheOperations;
use crate::cache::codec::{HashRecord, SubRecord, decode, encode};
use crate::cache::error::CacheError;
use crate::cache::keys::{profile_key_for, sub_collection_key, sub_record_key, token_key};
use crate::cache::models::SessionToken;
use crate::cache::policy::CachePolicy;
use crate::cache::store::CacheConnection;

/// 用户资料及子记录缓存操作
///
/// 所有数据都只能经由有效令牌找到；令牌不存在时写操作什么也不做，
/// 读操作返回 `None`。
pub struct ProfileCacheOperations;

impl ProfileCacheOperations {
    /// 整体替换用户资料，返回是否写入
    pub async fn store_profile<C, T>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        record: &T,
    ) -> Result<bool, CacheError>
    where
        C: CacheConnection,
        T: HashRecord,
    {
        let Some(user_id) = TokenCacheOperations::resolve(conn, policy, token, false).await? else {
            return Ok(false);
        };

        let key = profile_key_for(policy.profile_key_style, user_id);
        conn.replace_hash(&key, &encode(record), policy.data_ttl)
            .await?;
        debug!(%key, "profile stored");

        Ok(true)
    }

    /// 读取用户资料并续期
    ///
    /// 资料哈希不存在时返回全默认值的记录，而不是 `None`。
    pub async fn get_profile<C, T>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
    ) -> Result<Option<T>, CacheError>
    where
        C: CacheConnection,
        T: HashRecord,
    {
        let Some(user_id) = TokenCacheOperations::resolve(conn, policy, token, false).await? else {
            return Ok(None);
        };

        let key = profile_key_for(policy.profile_key_style, user_id);
        let fields = conn.hgetall(&key).await?;
        if fields.is_empty() {
            debug!(%key, "profile not cached");
        } else if let Err(e) = conn.expire(&key, policy.data_ttl).await {
            warn!(%key, error = %e, "failed to refresh profile ttl");
        }

        decode(&fields).map(Some)
    }

    /// 重建用户的子记录集合，返回是否写入
    ///
    /// 先清空旧集合，避免重复登录时 ID 重复累积。该过程不是原子的，
    /// 并发读取可能看到部分重建的集合。
    pub async fn store_sub_records<C, T>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        records: &[T],
    ) -> Result<bool, CacheError>
    where
        C: CacheConnection,
        T: SubRecord,
    {
        let Some(user_id) = TokenCacheOperations::resolve(conn, policy, token, false).await? else {
            return Ok(false);
        };

        let list_key = sub_collection_key(T::KIND, user_id);
        conn.del(&[list_key.clone()]).await?;

        for (i, record) in records.iter().enumerate() {
            let id = record.record_id();
            conn.replace_hash(&sub_record_key(T::KIND, id), &encode(record), policy.data_ttl)
                .await?;
            conn.rpush(&list_key, &id.to_string()).await?;
            // 列表一创建就带上过期时间，中途失败也不会留下永久键
            if i == 0 {
                conn.expire(&list_key, policy.data_ttl).await?;
            }
        }
        debug!(key = %list_key, count = records.len(), "sub records stored");

        Ok(true)
    }

    /// 分页读取子记录：从 `offset` 开始最多 `count` 条，按写入顺序
    ///
    /// 已经过期的单条记录直接跳过。
    pub async fn get_sub_records<C, T>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        offset: usize,
        count: usize,
    ) -> Result<Option<Vec<T>>, CacheError>
    where
        C: CacheConnection,
        T: SubRecord,
    {
        let Some(user_id) = TokenCacheOperations::resolve(conn, policy, token, false).await? else {
            return Ok(None);
        };

        let list_key = sub_collection_key(T::KIND, user_id);
        if let Err(e) = conn.expire(&list_key, policy.data_ttl).await {
            warn!(key = %list_key, error = %e, "failed to refresh collection ttl");
        }
        if count == 0 {
            return Ok(Some(Vec::new()));
        }

        // 负数起点在 LRANGE 里表示从尾部数
        let Ok(start) = isize::try_from(offset) else {
            return Ok(Some(Vec::new()));
        };
        let stop = isize::try_from(offset.saturating_add(count - 1)).unwrap_or(isize::MAX);
        let ids = conn.lrange(&list_key, start, stop).await?;

        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            let key = sub_record_key(T::KIND, &id);
            let fields = conn.hgetall(&key).await?;
            if fields.is_empty() {
                debug!(kind = T::KIND, %id, "sub record missing, skipped");
                continue;
            }
            if let Err(e) = conn.expire(&key, policy.data_ttl).await {
                warn!(%key, error = %e, "failed to refresh sub record ttl");
            }
            records.push(decode(&fields)?);
        }

        Ok(Some(records))
    }

    /// 删除令牌、资料以及登记的各类子记录
    ///
    /// 令牌已失效时什么也不做。
    pub async fn delete_all<C: CacheConnection>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        sub_record_kinds: &[&'static str],
    ) -> Result<(), CacheError> {
        let Some(user_id) = TokenCacheOperations::resolve(conn, policy, token, false).await? else {
            return Ok(());
        };

        let mut keys = vec![
            token_key(token),
            profile_key_for(policy.profile_key_style, user_id),
        ];
        for kind in sub_record_kinds {
            let list_key = sub_collection_key(kind, user_id);
            keys.extend(
                conn.lrange(&list_key, 0, -1)
                    .await?
                    .into_iter()
                    .map(|id| sub_record_key(kind, id)),
            );
            keys.push(list_key);
        }

        let removed = conn.del(&keys).await?;
        debug!(%user_id, removed, "user data deleted");

        Ok(())
    }
}

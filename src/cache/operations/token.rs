use tracing::{debug, warn};

use crate::cache::error::CacheError;
use crate::cache::keys::token_key;
use crate::cache::models::{SessionToken, UserId};
use crate::cache::policy::CachePolicy;
use crate::cache::store::CacheConnection;

/// 令牌缓存操作
pub struct TokenCacheOperations;

impl TokenCacheOperations {
    /// 写入令牌 -> 用户 ID，总是覆盖
    pub async fn store<C: CacheConnection>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        user_id: UserId,
    ) -> Result<(), CacheError> {
        let key = token_key(token);
        conn.set_ex(&key, &user_id.to_string(), policy.token_ttl)
            .await?;
        debug!(%key, %user_id, "token stored");
        Ok(())
    }

    /// 解析令牌对应的用户 ID
    ///
    /// `refresh_ttl` 为真时把令牌存活时间重置为完整窗口（滑动过期），
    /// 续期失败只记录日志，不影响结果。
    pub async fn resolve<C: CacheConnection>(
        conn: &mut C,
        policy: &CachePolicy,
        token: &SessionToken,
        refresh_ttl: bool,
    ) -> Result<Option<UserId>, CacheError> {
        let key = token_key(token);
        let Some(raw) = conn.get(&key).await? else {
            debug!(%key, "token not found");
            return Ok(None);
        };
        let user_id = UserId::parse_stored(&raw)?;

        if refresh_ttl {
            if let Err(e) = conn.expire(&key, policy.token_ttl).await {
                warn!(%key, error = %e, "failed to refresh token ttl");
            }
        }

        Ok(Some(user_id))
    }

    /// 删除令牌，不存在也不算错误
    pub async fn delete<C: CacheConnection>(
        conn: &mut C,
        token: &SessionToken,
    ) -> Result<(), CacheError> {
        conn.del(&[token_key(token)]).await?;
        Ok(())
    }
}

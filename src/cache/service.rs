use tracing::{debug, warn};

use crate::cache::codec::{HashRecord, SubRecord};
use crate::cache::error::CacheError;
use crate::cache::models::{SessionToken, UserId};
use crate::cache::operations::{ProfileCacheOperations, TokenCacheOperations};
use crate::cache::policy::CachePolicy;
use crate::cache::store::CacheStore;

/// 用户数据缓存服务
///
/// 登录、每次请求的会话校验、注销和资料展示都只通过这里访问缓存。
/// 每个方法独立借用一个连接，方法返回时归还。
pub struct CustomerDataService<S> {
    store: S,
    policy: CachePolicy,
    sub_record_kinds: Vec<&'static str>,
}

impl<S: CacheStore> CustomerDataService<S> {
    pub fn new(store: S, policy: CachePolicy) -> Self {
        Self {
            store,
            policy,
            sub_record_kinds: Vec::new(),
        }
    }

    /// 登记一种子记录，注销时会一并删除
    pub fn register_sub_record<T: SubRecord>(mut self) -> Self {
        if !self.sub_record_kinds.contains(&T::KIND) {
            self.sub_record_kinds.push(T::KIND);
        }
        self
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    /// 保存令牌与用户 ID 的对应关系
    pub async fn store_user_token(
        &self,
        token: &SessionToken,
        user_id: UserId,
    ) -> Result<(), CacheError> {
        let mut conn = self.store.connection().await?;
        TokenCacheOperations::store(&mut conn, &self.policy, token, user_id).await
    }

    pub async fn resolve_user_id(
        &self,
        token: &SessionToken,
        refresh_ttl: bool,
    ) -> Result<Option<UserId>, CacheError> {
        let mut conn = self.store.connection().await?;
        TokenCacheOperations::resolve(&mut conn, &self.policy, token, refresh_ttl).await
    }

    /// 会话是否仍然有效，有效时顺便续期
    ///
    /// 任何错误都按无效处理，不向上抛出。
    pub async fn validate_user_token_exists(&self, token: &SessionToken) -> bool {
        match self.resolve_user_id(token, true).await {
            Ok(user_id) => user_id.is_some(),
            Err(e) => {
                warn!(error = %e, "token validation failed, treating session as invalid");
                false
            }
        }
    }

    /// 保存用户资料，令牌已失效时返回 `false`
    pub async fn store_profile_data<T: HashRecord>(
        &self,
        token: &SessionToken,
        data: &T,
    ) -> Result<bool, CacheError> {
        let mut conn = self.store.connection().await?;
        ProfileCacheOperations::store_profile(&mut conn, &self.policy, token, data).await
    }

    pub async fn get_profile_data<T: HashRecord>(
        &self,
        token: &SessionToken,
    ) -> Result<Option<T>, CacheError> {
        let mut conn = self.store.connection().await?;
        ProfileCacheOperations::get_profile(&mut conn, &self.policy, token).await
    }

    pub async fn store_sub_records<T: SubRecord>(
        &self,
        token: &SessionToken,
        records: &[T],
    ) -> Result<bool, CacheError> {
        let mut conn = self.store.connection().await?;
        ProfileCacheOperations::store_sub_records(&mut conn, &self.policy, token, records).await
    }

    pub async fn get_sub_records<T: SubRecord>(
        &self,
        token: &SessionToken,
        offset: usize,
        count: usize,
    ) -> Result<Option<Vec<T>>, CacheError> {
        let mut conn = self.store.connection().await?;
        ProfileCacheOperations::get_sub_records(&mut conn, &self.policy, token, offset, count)
            .await
    }

    /// 删除该会话的全部缓存数据
    pub async fn delete_user_data(&self, token: &SessionToken) -> Result<(), CacheError> {
        let mut conn = self.store.connection().await?;
        ProfileCacheOperations::delete_all(&mut conn, &self.policy, token, &self.sub_record_kinds)
            .await
    }

    /// 注销时调用，失败只记录日志
    pub async fn delete_user_data_quietly(&self, token: &SessionToken) {
        match self.delete_user_data(token).await {
            Ok(()) => debug!("session data cleaned up"),
            Err(e) => warn!(error = %e, "failed to clean up session data"),
        }
    }

    /// 只删除令牌
    pub async fn delete_token(&self, token: &SessionToken) -> Result<(), CacheError> {
        let mut conn = self.store.connection().await?;
        TokenCacheOperations::delete(&mut conn, token).await
    }
}

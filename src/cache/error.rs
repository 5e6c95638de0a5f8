use thiserror::Error;

/// 缓存层错误
///
/// 会话过期、数据不存在不属于错误，统一以 `None` / `false` 返回。
#[derive(Debug, Error)]
pub enum CacheError {
    /// 存储中的字段无法解析为记录声明的类型
    #[error("field {field} holds {value:?}, which is not a valid {expected}")]
    TypeMismatch {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("could not acquire a store connection: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("store command failed: {0}")]
    Redis(#[from] redis::RedisError),

    /// 令牌不是 32 位十六进制字符串
    #[error("malformed session token {0:?}")]
    InvalidToken(String),
}

impl CacheError {
    /// 是否为存储不可达一类的错误
    pub fn is_connectivity(&self) -> bool {
        match self {
            CacheError::Pool(_) => true,
            CacheError::Redis(e) => {
                e.kind() == redis::ErrorKind::IoError
                    || e.is_connection_dropped()
                    || e.is_timeout()
            }
            _ => false,
        }
    }
}

use std::time::Duration;

use crate::cache::keys::ProfileKeyStyle;

/// 默认令牌存活时间（分钟）
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 5;

/// 默认资料存活时间（分钟）
pub const DEFAULT_DATA_TTL_MINUTES: u64 = 120;

/// 缓存过期策略
///
/// 两个窗口互相独立：令牌过期不会连带删除资料，反之亦然。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub token_ttl: Duration,
    pub data_ttl: Duration,
    pub profile_key_style: ProfileKeyStyle,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60),
            data_ttl: Duration::from_secs(DEFAULT_DATA_TTL_MINUTES * 60),
            profile_key_style: ProfileKeyStyle::default(),
        }
    }
}

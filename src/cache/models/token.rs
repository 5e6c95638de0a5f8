use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::cache::error::CacheError;

/// 会话令牌
///
/// 128 位随机数，对外只以 32 位小写十六进制（无连字符）出现，
/// 既用作缓存键的一部分，也写入认证声明。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionToken(Uuid);

impl SessionToken {
    /// 生成新的随机令牌
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn to_hex(&self) -> String {
        self.0.simple().to_string()
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionToken {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CacheError::InvalidToken(s.to_string()));
        }
        Uuid::try_parse(s)
            .map(Self)
            .map_err(|_| CacheError::InvalidToken(s.to_string()))
    }
}

/// 业务系统提供的用户 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl UserId {
    /// 解析令牌条目中保存的用户 ID
    pub fn parse_stored(raw: &str) -> Result<Self, CacheError> {
        raw.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| CacheError::TypeMismatch {
                field: "UserId",
                value: raw.to_string(),
                expected: "i64",
            })
    }
}

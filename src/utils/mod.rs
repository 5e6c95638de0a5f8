use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::cache::models::SessionToken;
use crate::config::Config;

/// 认证声明
///
/// 只携带用户名和会话令牌，资料本身在缓存里。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // 用户名
    pub user_token: String, // 会话令牌（十六进制）
    pub exp: i64,           // 过期时间
    pub iat: i64,           // 签发时间
}

impl Claims {
    pub fn session_token(&self) -> Option<SessionToken> {
        self.user_token.parse().ok()
    }
}

pub fn generate_token(
    username: &str,
    session: &SessionToken,
    config: &Config,
) -> Result<(String, i64), jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let expiration = (now + Duration::seconds(config.jwt_expiration().as_secs() as i64)).timestamp();

    let claims = Claims {
        sub: username.to_string(),
        user_token: session.to_hex(),
        exp: expiration,
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;

    Ok((token, expiration))
}

pub fn verify_token(token: &str, config: &Config) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

/// 用户名只允许字母、数字以及 `_` `.` `-` `@`
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username.len() <= 64
        && username
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-' | '@'))
}

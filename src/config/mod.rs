use std::env;
use std::time::Duration;

use crate::cache::keys::ProfileKeyStyle;
use crate::cache::policy::{CachePolicy, DEFAULT_DATA_TTL_MINUTES, DEFAULT_TOKEN_TTL_MINUTES};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub redis_url: String,
    pub redis_pool_size: usize,
    pub jwt_secret: String,
    pub jwt_expiration_secs: u64,
    pub token_ttl_minutes: u64,
    pub data_ttl_minutes: u64,
    pub profile_key_style: ProfileKeyStyle,
    pub crm_base_url: Option<String>,
    pub server_host: String,
    pub server_port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let jwt_expiration_secs: u64 = parse_or("JWT_EXPIRATION", 24 * 3600, |raw| {
            parse_jwt_hours(raw).map(|hours| hours * 3600)
        })?;

        Ok(Config {
            redis_url: required("REDIS_URL")?,
            redis_pool_size: parse_or("REDIS_POOL_SIZE", 16, |raw| raw.parse().ok())?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration_secs,
            token_ttl_minutes: parse_or("TOKEN_TTL_MINUTES", DEFAULT_TOKEN_TTL_MINUTES, parse_minutes)?,
            data_ttl_minutes: parse_or("DATA_TTL_MINUTES", DEFAULT_DATA_TTL_MINUTES, parse_minutes)?,
            profile_key_style: parse_or(
                "PROFILE_KEY_STYLE",
                ProfileKeyStyle::Profiles,
                parse_key_style,
            )?,
            crm_base_url: env::var("CRM_BASE_URL").ok().filter(|url| !url.is_empty()),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            server_port: parse_or("SERVER_PORT", 3000, |raw| raw.parse().ok())?,
        })
    }

    pub fn jwt_expiration(&self) -> Duration {
        Duration::from_secs(self.jwt_expiration_secs)
    }

    /// 令牌与资料的过期策略
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            token_ttl: Duration::from_secs(self.token_ttl_minutes * 60),
            data_ttl: Duration::from_secs(self.data_ttl_minutes * 60),
            profile_key_style: self.profile_key_style,
        }
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

/// 未设置时使用默认值，设置了但无法解析时报错
fn parse_or<T>(
    key: &'static str,
    default: T,
    parse: impl FnOnce(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse(raw.trim()).ok_or(ConfigError::Invalid { key, value: raw }),
        Err(_) => Ok(default),
    }
}

const MAX_JWT_EXPIRATION_HOURS: u64 = 24 * 366;

/// 接受 `24` 或 `24h`，最长一年
fn parse_jwt_hours(raw: &str) -> Option<u64> {
    raw.trim_end_matches('h')
        .parse::<u64>()
        .ok()
        .filter(|hours| (1..=MAX_JWT_EXPIRATION_HOURS).contains(hours))
}

/// 过期时间必须大于零，且换算成秒不溢出
fn parse_minutes(raw: &str) -> Option<u64> {
    raw.parse::<u64>()
        .ok()
        .filter(|minutes| *minutes > 0 && minutes.checked_mul(60).is_some())
}

fn parse_key_style(raw: &str) -> Option<ProfileKeyStyle> {
    match raw.to_ascii_lowercase().as_str() {
        "profiles" => Some(ProfileKeyStyle::Profiles),
        "basicdata" => Some(ProfileKeyStyle::BasicData),
        _ => None,
    }
}

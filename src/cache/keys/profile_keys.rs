use std::fmt;

use crate::cache::models::{SessionToken, UserId};

/// 令牌 -> 用户 ID 键前缀
const TOKEN_PREFIX: &str = "tokens:";

/// 用户资料键前缀
const PROFILE_PREFIX: &str = "profiles:";

/// 基础资料与子记录分开存放时使用的前缀
const BASIC_DATA_PREFIX: &str = "basicdata:";

/// 用户资料键的命名方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfileKeyStyle {
    /// `profiles:<user_id>`
    #[default]
    Profiles,
    /// `basicdata:<user_id>`
    BasicData,
}

/// 生成令牌键
pub fn token_key(token: &SessionToken) -> String {
    format!("{}{}", TOKEN_PREFIX, token.to_hex())
}

/// 生成用户资料键
pub fn profile_key(user_id: UserId) -> String {
    format!("{}{}", PROFILE_PREFIX, user_id)
}

/// 生成基础资料键
pub fn basic_data_key(user_id: UserId) -> String {
    format!("{}{}", BASIC_DATA_PREFIX, user_id)
}

/// 按配置的命名方式生成资料键
pub fn profile_key_for(style: ProfileKeyStyle, user_id: UserId) -> String {
    match style {
        ProfileKeyStyle::Profiles => profile_key(user_id),
        ProfileKeyStyle::BasicData => basic_data_key(user_id),
    }
}

/// 生成子记录集合键，例如 `supportinquirys:1210`
pub fn sub_collection_key(kind: &str, user_id: UserId) -> String {
    format!("{}s:{}", kind, user_id)
}

/// 生成单条子记录键，例如 `supportinquiry:7`
pub fn sub_record_key(kind: &str, id: impl fmt::Display) -> String {
    format!("{}:{}", kind, id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::cache::codec::SubRecord;
    use crate::cache::models::SupportInquiry;

    #[test]
    fn key_layout_is_stable() {
        let token: SessionToken = "0123456789abcdef0123456789abcdef".parse().unwrap();

        assert_eq!(token_key(&token), "tokens:0123456789abcdef0123456789abcdef");
        assert_eq!(profile_key(UserId(1210)), "profiles:1210");
        assert_eq!(basic_data_key(UserId(1210)), "basicdata:1210");
        assert_eq!(
            sub_collection_key(SupportInquiry::KIND, UserId(1210)),
            "supportinquirys:1210"
        );
        assert_eq!(sub_record_key(SupportInquiry::KIND, 7), "supportinquiry:7");
    }

    #[test]
    fn profile_style_selects_prefix() {
        assert_eq!(
            profile_key_for(ProfileKeyStyle::Profiles, UserId(5)),
            "profiles:5"
        );
        assert_eq!(
            profile_key_for(ProfileKeyStyle::BasicData, UserId(5)),
            "basicdata:5"
        );
    }

    #[test]
    fn keys_of_different_entities_do_not_collide() {
        let kind = SupportInquiry::KIND;
        let keys = [
            profile_key(UserId(1)),
            basic_data_key(UserId(1)),
            sub_collection_key(kind, UserId(1)),
            sub_record_key(kind, 1),
            token_key(&"00000000000000000000000000000001".parse().unwrap()),
        ];
        let unique: HashSet<_> = keys.iter().collect();

        assert_eq!(unique.len(), keys.len());
    }
}

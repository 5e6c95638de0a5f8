/// 缓存键模块
/// 所有键均为纯字符串，ID 只含数字或十六进制字符，不需要转义
pub mod profile_keys;

pub use profile_keys::{
    ProfileKeyStyle, basic_data_key, profile_key, profile_key_for, sub_collection_key,
    sub_record_key, token_key,
};

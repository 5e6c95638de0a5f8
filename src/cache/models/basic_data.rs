use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::hash_record! {
    /// 用户基础资料，缓存为 Redis 哈希
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct BasicData {
        pub user_id: i64 => "UserId",
        pub first_name: Option<String> => "FirstName",
        pub last_name: Option<String> => "LastName",
        pub email: Option<String> => "Email",
        pub phone_number: Option<String> => "PhoneNumber",
        pub address_line1: Option<String> => "AddressLine1",
        pub postal_code: Option<String> => "PostalCode",
        pub city: Option<String> => "City",
        pub country: Option<String> => "Country",
        pub has_marketing_permission: bool => "HasMarketingPermission",
        pub created_date: Option<DateTime<Utc>> => "CreatedDate",
    }
}

impl BasicData {
    /// 哈希不存在时解码得到全默认值，用来区分“无数据”
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

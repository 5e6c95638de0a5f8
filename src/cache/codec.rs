//! 记录 <-> Redis 哈希 的映射
//!
//! 每种记录通过 [`hash_record!`](crate::hash_record) 在编译期登记字段表，
//! 编码时跳过值为空的字段，解码时缺失字段保留默认值，
//! 存在但无法解析的字段让整次解码失败。

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::cache::error::CacheError;

/// 扁平字段表，即 Redis 哈希的内容
pub type FieldMap = HashMap<String, String>;

/// 可以存成单个哈希字段的标量
pub trait FieldValue: Sized {
    /// 类型名，用于错误信息
    const TYPE_NAME: &'static str;

    /// `None` 表示该字段不写入
    fn to_field(&self) -> Option<String>;

    fn from_field(raw: &str) -> Option<Self>;
}

macro_rules! numeric_field_value {
    ($($ty:ty),*) => {
        $(
            impl FieldValue for $ty {
                const TYPE_NAME: &'static str = stringify!($ty);

                fn to_field(&self) -> Option<String> {
                    Some(self.to_string())
                }

                fn from_field(raw: &str) -> Option<Self> {
                    raw.trim().parse().ok()
                }
            }
        )*
    };
}

numeric_field_value!(i32, i64, u32, u64, f64);

impl FieldValue for String {
    const TYPE_NAME: &'static str = "string";

    fn to_field(&self) -> Option<String> {
        Some(self.clone())
    }

    fn from_field(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl FieldValue for bool {
    const TYPE_NAME: &'static str = "bool";

    fn to_field(&self) -> Option<String> {
        Some(self.to_string())
    }

    // 旧数据里布尔值是 "True"/"False"
    fn from_field(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Some(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Some(false)
        } else {
            None
        }
    }
}

impl FieldValue for DateTime<Utc> {
    const TYPE_NAME: &'static str = "RFC 3339 timestamp";

    fn to_field(&self) -> Option<String> {
        Some(self.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    fn from_field(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }
}

impl FieldValue for NaiveDate {
    const TYPE_NAME: &'static str = "date";

    fn to_field(&self) -> Option<String> {
        Some(self.format("%Y-%m-%d").to_string())
    }

    fn from_field(raw: &str) -> Option<Self> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn to_field(&self) -> Option<String> {
        self.as_ref().and_then(FieldValue::to_field)
    }

    fn from_field(raw: &str) -> Option<Self> {
        T::from_field(raw).map(Some)
    }
}

/// 字段表中的一项
pub struct Field<T> {
    pub name: &'static str,
    pub type_name: &'static str,
    pub get: fn(&T) -> Option<String>,
    /// 解析失败时返回 `false`
    pub set: fn(&mut T, &str) -> bool,
}

/// 可以映射为 Redis 哈希的扁平记录
pub trait HashRecord: Default + Send + Sync + Sized + 'static {
    fn fields() -> &'static [Field<Self>];
}

/// 带自身 ID、按用户归集成列表的子记录
pub trait SubRecord: HashRecord {
    /// 键前缀，集合键为 `<KIND>s:<user_id>`，记录键为 `<KIND>:<id>`
    const KIND: &'static str;

    fn record_id(&self) -> i64;
}

/// 把记录编码为字段表，空值字段不写入
pub fn encode<T: HashRecord>(record: &T) -> FieldMap {
    T::fields()
        .iter()
        .filter_map(|field| (field.get)(record).map(|value| (field.name.to_string(), value)))
        .collect()
}

/// 从字段表还原记录
pub fn decode<T: HashRecord>(map: &FieldMap) -> Result<T, CacheError> {
    let mut record = T::default();

    for field in T::fields() {
        let Some(raw) = map.get(field.name) else {
            continue;
        };
        if !(field.set)(&mut record, raw) {
            return Err(CacheError::TypeMismatch {
                field: field.name,
                value: raw.clone(),
                expected: field.type_name,
            });
        }
    }

    Ok(record)
}

/// 定义一个记录结构体，同时登记它的哈希字段表
///
/// ```ignore
/// hash_record! {
///     #[derive(Debug, Default)]
///     pub struct Note {
///         pub id: i64 => "Id",
///         pub body: Option<String> => "Body",
///     }
/// }
/// ```
#[macro_export]
macro_rules! hash_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $wire:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::cache::codec::HashRecord for $name {
            fn fields() -> &'static [$crate::cache::codec::Field<Self>] {
                const FIELDS: &[$crate::cache::codec::Field<$name>] = &[
                    $(
                        $crate::cache::codec::Field {
                            name: $wire,
                            type_name: <$ty as $crate::cache::codec::FieldValue>::TYPE_NAME,
                            get: |record: &$name| {
                                <$ty as $crate::cache::codec::FieldValue>::to_field(&record.$field)
                            },
                            set: |record: &mut $name, raw: &str| {
                                match <$ty as $crate::cache::codec::FieldValue>::from_field(raw) {
                                    Some(value) => {
                                        record.$field = value;
                                        true
                                    }
                                    None => false,
                                }
                            },
                        },
                    )*
                ];
                FIELDS
            }
        }
    };
}

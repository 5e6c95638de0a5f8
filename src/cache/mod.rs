// 缓存模块
// 令牌 -> 用户 ID -> 资料/子记录，各自独立的滑动过期窗口

pub mod codec;
pub mod error;
pub mod keys;
pub mod models;
pub mod operations;
pub mod policy;
pub mod service;
pub mod store;

// 重新导出常用类型，方便其他模块使用
pub use codec::{FieldMap, HashRecord, SubRecord};
pub use error::CacheError;
pub use models::{BasicData, SessionToken, SupportInquiry, UserId};
pub use policy::CachePolicy;
pub use service::CustomerDataService;
pub use store::{CacheStore, MemoryStore, RedisStore};

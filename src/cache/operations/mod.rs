/// 缓存操作
/// 每个函数都在调用方借出的同一个连接上执行

pub mod profile;
pub mod token;

pub use profile::ProfileCacheOperations;
pub use token::TokenCacheOperations;

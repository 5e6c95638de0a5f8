/// 缓存数据模型
pub mod basic_data;
pub mod support_inquiry;
pub mod token;

pub use basic_data::BasicData;
pub use support_inquiry::SupportInquiry;
pub use token::{SessionToken, UserId};

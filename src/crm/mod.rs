//! 业务系统（CRM）接口
//!
//! 登录时校验用户名密码，并提供权威的用户资料；缓存失效后也从这里重新加载。

pub mod demo;
pub mod http;

use async_trait::async_trait;

use crate::cache::models::{BasicData, SupportInquiry};

pub use demo::DemoDirectory;
pub use http::HttpCrm;

#[derive(Debug, thiserror::Error)]
pub enum CrmError {
    #[error("unknown user {0}")]
    UnknownUser(String),

    #[error("crm request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

#[async_trait]
pub trait SystemOfRecord: Send + Sync {
    /// 校验登录凭据
    async fn validate(&self, username: &str, password: &str) -> Result<bool, CrmError>;

    async fn basic_data(&self, username: &str) -> Result<BasicData, CrmError>;

    async fn support_inquiries(&self, username: &str) -> Result<Vec<SupportInquiry>, CrmError>;
}

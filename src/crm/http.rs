use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{CrmError, SystemOfRecord};
use crate::cache::models::{BasicData, SupportInquiry};

#[derive(Serialize)]
struct ValidateRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct ValidateResponse {
    valid: bool,
}

/// 通过 HTTP JSON 接口访问外部 CRM
#[derive(Clone)]
pub struct HttpCrm {
    client: Client,
    base_url: String,
}

impl HttpCrm {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn customer_url(&self, username: &str, suffix: &str) -> String {
        format!("{}/customers/{}{}", self.base_url, username, suffix)
    }

    async fn get_json<T>(&self, url: String, username: &str) -> Result<T, CrmError>
    where
        T: for<'de> Deserialize<'de>,
    {
        debug!(%url, "fetching from crm");
        let response = self.client.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CrmError::UnknownUser(username.to_string()));
        }
        Ok(response.error_for_status()?.json().await?)
    }
}

#[async_trait]
impl SystemOfRecord for HttpCrm {
    async fn validate(&self, username: &str, password: &str) -> Result<bool, CrmError> {
        let response: ValidateResponse = self
            .client
            .post(format!("{}/auth/validate", self.base_url))
            .json(&ValidateRequest { username, password })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.valid)
    }

    async fn basic_data(&self, username: &str) -> Result<BasicData, CrmError> {
        self.get_json(self.customer_url(username, ""), username).await
    }

    async fn support_inquiries(&self, username: &str) -> Result<Vec<SupportInquiry>, CrmError> {
        self.get_json(self.customer_url(username, "/support-inquiries"), username)
            .await
    }
}

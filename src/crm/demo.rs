use std::collections::HashMap;

use async_trait::async_trait;
use bcrypt::{hash, verify};
use chrono::{TimeZone, Utc};

use super::{CrmError, SystemOfRecord};
use crate::cache::models::{BasicData, SupportInquiry};

struct DirectoryEntry {
    password_hash: String,
    basic_data: BasicData,
    support_inquiries: Vec<SupportInquiry>,
}

/// 进程内的用户目录，在没有配置外部 CRM 时使用
pub struct DemoDirectory {
    cost: u32,
    users: HashMap<String, DirectoryEntry>,
}

impl DemoDirectory {
    /// 指定 bcrypt 强度，测试里用低强度加快速度
    pub fn with_cost(cost: u32) -> Self {
        Self {
            cost,
            users: HashMap::new(),
        }
    }

    /// 预置演示用户 stefan
    pub fn seeded(cost: u32, password: &str) -> Result<Self, CrmError> {
        let created_date = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).single();
        let basic_data = BasicData {
            user_id: 1210,
            first_name: Some("Stefan".into()),
            last_name: Some("Olsen".into()),
            email: Some("stefan@test.com".into()),
            has_marketing_permission: true,
            created_date,
            ..Default::default()
        };
        let inquiries = vec![SupportInquiry {
            id: 1,
            is_closed: false,
            description: Some("Where is my order?".into()),
            submitted_date: created_date,
            submitter_email: Some("stefan@test.com".into()),
            submitter_name: Some("Stefan Olsen".into()),
        }];

        Self::with_cost(cost).with_user("stefan", password, basic_data, inquiries)
    }

    pub fn with_user(
        mut self,
        username: &str,
        password: &str,
        basic_data: BasicData,
        support_inquiries: Vec<SupportInquiry>,
    ) -> Result<Self, CrmError> {
        let password_hash = hash(password.as_bytes(), self.cost)?;
        self.users.insert(
            username.to_string(),
            DirectoryEntry {
                password_hash,
                basic_data,
                support_inquiries,
            },
        );
        Ok(self)
    }

    fn entry(&self, username: &str) -> Result<&DirectoryEntry, CrmError> {
        self.users
            .get(username)
            .ok_or_else(|| CrmError::UnknownUser(username.to_string()))
    }
}

#[async_trait]
impl SystemOfRecord for DemoDirectory {
    async fn validate(&self, username: &str, password: &str) -> Result<bool, CrmError> {
        match self.users.get(username) {
            Some(entry) => Ok(verify(password.as_bytes(), &entry.password_hash)?),
            None => Ok(false),
        }
    }

    async fn basic_data(&self, username: &str) -> Result<BasicData, CrmError> {
        Ok(self.entry(username)?.basic_data.clone())
    }

    async fn support_inquiries(&self, username: &str) -> Result<Vec<SupportInquiry>, CrmError> {
        Ok(self.entry(username)?.support_inquiries.clone())
    }
}

use serde::{Deserialize, Serialize};

use crate::cache::{BasicData, SupportInquiry};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// 工单分页参数
#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub offset: Option<usize>,
    pub count: Option<usize>,
}

impl ProfileQuery {
    pub fn page(&self) -> (usize, usize) {
        let count = self.count.unwrap_or(DEFAULT_PAGE_SIZE).min(MAX_PAGE_SIZE);
        (self.offset.unwrap_or(0), count)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyProfileResponse {
    pub basic_data: BasicData,
    pub support_inquiries: Vec<SupportInquiry>,
}

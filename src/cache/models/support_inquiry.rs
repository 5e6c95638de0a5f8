use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cache::codec::SubRecord;

crate::hash_record! {
    /// 客服工单
    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SupportInquiry {
        pub id: i64 => "Id",
        pub is_closed: bool => "IsClosed",
        pub description: Option<String> => "Description",
        pub submitted_date: Option<DateTime<Utc>> => "SubmittedDate",
        pub submitter_email: Option<String> => "SubmitterEmail",
        pub submitter_name: Option<String> => "SubmitterName",
    }
}

impl SubRecord for SupportInquiry {
    const KIND: &'static str = "supportinquiry";

    fn record_id(&self) -> i64 {
        self.id
    }
}

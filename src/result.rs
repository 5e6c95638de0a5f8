use axum::Json;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResult<T: Serialize> {
    pub code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<T>,
}

impl<T: Serialize> ApiResult<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: 0,
            error_message: None,
            content: Some(data),
        }
    }

    /// 包装成 JSON 响应体
    pub fn json(data: T) -> Json<Self> {
        Json(Self::success(data))
    }
}

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use tracing::{info, warn};

use crate::{
    AppState,
    cache::{CacheStore, SessionToken, UserId},
    error::AppError,
    middleware::bearer_claims,
    result::ApiResult,
    utils::{generate_token, is_valid_username},
};

use super::model::{LoginRequest, LoginResponse, LogoffResponse};

/// 登录
///
/// 凭据交给业务系统校验，通过后把资料写入缓存并签发只携带会话令牌的 JWT。
pub async fn login<S: CacheStore>(
    State(state): State<AppState<S>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResult<LoginResponse>>, AppError> {
    if !is_valid_username(&req.username) {
        return Err(AppError::InvalidRequest(
            "用户名格式无效，只允许使用字母、数字和 _ . - @".to_string(),
        ));
    }

    if !state.crm.validate(&req.username, &req.password).await? {
        info!(user = %req.username, "login rejected");
        return Err(AppError::InvalidCredentials);
    }

    let basic_data = state.crm.basic_data(&req.username).await?;
    let inquiries = state.crm.support_inquiries(&req.username).await?;
    let user_id = UserId(basic_data.user_id);

    // 令牌写不进去就没有会话，登录失败
    let session = SessionToken::generate();
    state.cache.store_user_token(&session, user_id).await?;

    // 资料写失败时展示页会重新加载
    if let Err(e) = state.cache.store_profile_data(&session, &basic_data).await {
        warn!(%user_id, error = %e, "failed to cache profile at login");
    }
    if let Err(e) = state.cache.store_sub_records(&session, &inquiries).await {
        warn!(%user_id, error = %e, "failed to cache support inquiries at login");
    }

    let (token, expires_at) = generate_token(&req.username, &session, &state.config)
        .map_err(|e| {
            warn!(error = %e, "failed to sign token");
            AppError::InternalServerError
        })?;

    info!(user = %req.username, %user_id, "user logged in");
    Ok(ApiResult::json(LoginResponse {
        user_id: user_id.0,
        token,
        expires_at,
    }))
}

/// 注销，总是成功
pub async fn logoff<S: CacheStore>(
    State(state): State<AppState<S>>,
    headers: HeaderMap,
) -> Json<ApiResult<LogoffResponse>> {
    let session = bearer_claims(&headers, &state.config)
        .and_then(|claims| claims.session_token().map(|session| (claims.sub, session)));

    if let Some((user, session)) = session {
        state.cache.delete_user_data_quietly(&session).await;
        info!(%user, "user logged off");
    }

    ApiResult::json(LogoffResponse {
        message: "已注销".to_string(),
    })
}

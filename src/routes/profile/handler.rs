use axum::{
    Extension,
    extract::{Json, Query, State},
};
use tracing::{debug, info, warn};

use crate::{
    AppState,
    cache::{BasicData, CacheStore, SessionToken, SupportInquiry},
    error::AppError,
    result::ApiResult,
    utils::Claims,
};

use super::model::{MyProfileResponse, ProfileQuery};

/// 当前用户资料
///
/// 资料和令牌各自过期，令牌还在而资料已过期时从业务系统重新加载。
pub async fn my_profile<S: CacheStore>(
    State(state): State<AppState<S>>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ProfileQuery>,
) -> Result<Json<ApiResult<MyProfileResponse>>, AppError> {
    let session = claims.session_token().ok_or(AppError::Unauthorized)?;
    let (offset, count) = query.page();

    // 中间件校验之后令牌仍可能刚好过期
    let basic_data: BasicData = state
        .cache
        .get_profile_data(&session)
        .await?
        .ok_or(AppError::SessionExpired)?;

    if basic_data.is_empty() {
        return rehydrate(&state, &claims.sub, &session, offset, count).await;
    }

    let support_inquiries: Vec<SupportInquiry> = state
        .cache
        .get_sub_records(&session, offset, count)
        .await?
        .unwrap_or_default();

    debug!(user = %claims.sub, "profile served from cache");
    Ok(ApiResult::json(MyProfileResponse {
        basic_data,
        support_inquiries,
    }))
}

async fn rehydrate<S: CacheStore>(
    state: &AppState<S>,
    username: &str,
    session: &SessionToken,
    offset: usize,
    count: usize,
) -> Result<Json<ApiResult<MyProfileResponse>>, AppError> {
    info!(user = %username, "cached profile expired, reloading");

    let basic_data = state.crm.basic_data(username).await?;
    let inquiries = state.crm.support_inquiries(username).await?;

    if let Err(e) = state.cache.store_profile_data(session, &basic_data).await {
        warn!(user = %username, error = %e, "failed to re-cache profile");
    }
    if let Err(e) = state.cache.store_sub_records(session, &inquiries).await {
        warn!(user = %username, error = %e, "failed to re-cache support inquiries");
    }

    let support_inquiries = inquiries.into_iter().skip(offset).take(count).collect();
    Ok(ApiResult::json(MyProfileResponse {
        basic_data,
        support_inquiries,
    }))
}

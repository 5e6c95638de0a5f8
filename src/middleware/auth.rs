use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;

use crate::{
    AppState,
    cache::CacheStore,
    config::Config,
    error::AppError,
    utils::{Claims, verify_token},
};

/// 从 `Authorization: Bearer` 头解出声明，签名或格式不对时返回 `None`
pub fn bearer_claims(headers: &HeaderMap, config: &Config) -> Option<Claims> {
    let bearer = headers.typed_get::<Authorization<Bearer>>()?;
    match verify_token(bearer.token(), config) {
        Ok(claims) => Some(claims),
        Err(e) => {
            debug!(error = %e, "rejecting bearer token");
            None
        }
    }
}

/// 会话校验中间件
///
/// JWT 只证明令牌是我们签发的，会话是否仍然有效以缓存为准，
/// 校验通过时令牌的过期时间会顺延。
pub async fn auth_middleware<S: CacheStore>(
    State(state): State<AppState<S>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = bearer_claims(request.headers(), &state.config).ok_or(AppError::Unauthorized)?;
    let session = claims.session_token().ok_or(AppError::Unauthorized)?;

    if !state.cache.validate_user_token_exists(&session).await {
        debug!(user = %claims.sub, "session no longer cached");
        return Err(AppError::SessionExpired);
    }

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

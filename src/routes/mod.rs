pub mod account;
pub mod profile;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::{
    AppState,
    cache::CacheStore,
    middleware::{auth_middleware, log_errors},
};

pub async fn ping() -> &'static str {
    "pong"
}

/// 组装全部路由
pub fn router<S: CacheStore>(state: AppState<S>) -> Router {
    let public_routes = Router::new()
        .route("/ping", get(ping))
        .route("/account/login", post(account::login::<S>))
        .route("/account/logoff", post(account::logoff::<S>));

    let protected_routes = Router::new()
        .route("/my-profile", get(profile::my_profile::<S>))
        .layer(from_fn_with_state(state.clone(), auth_middleware::<S>));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

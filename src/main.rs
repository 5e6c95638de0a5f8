use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use bcrypt::DEFAULT_COST;
use redis_profile::{
    AppState,
    cache::{CustomerDataService, RedisStore, SupportInquiry},
    config::Config,
    crm::{DemoDirectory, HttpCrm, SystemOfRecord},
    routes,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEMO_PASSWORD: &str = "password";

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置
    let config = Config::from_env().expect("Failed to load configuration");

    // Redis 连接池，连接在第一次使用时建立
    let store = RedisStore::connect(&config.redis_url, config.redis_pool_size)
        .expect("Failed to create Redis pool");
    let cache = CustomerDataService::new(store, config.cache_policy())
        .register_sub_record::<SupportInquiry>();

    let crm: Arc<dyn SystemOfRecord> = match &config.crm_base_url {
        Some(url) => {
            tracing::info!(%url, "Using remote CRM");
            Arc::new(HttpCrm::new(url.clone()))
        }
        None => {
            tracing::warn!("CRM_BASE_URL not set, using the built-in demo directory");
            Arc::new(
                DemoDirectory::seeded(DEFAULT_COST, DEMO_PASSWORD)
                    .expect("Failed to seed demo directory"),
            )
        }
    };

    let state = AppState::new(config.clone(), cache, crm);
    let router = routes::router(state);

    // 开发模式允许跨域
    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    let addr = SocketAddr::new(
        config.server_host.parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid server_host, falling back to dual-stack default");
            IpAddr::V6(std::net::Ipv6Addr::UNSPECIFIED)
        }),
        config.server_port,
    );
    tracing::info!("Server listening on {}", addr);
    axum::serve(
        tokio::net::TcpListener::bind(&addr)
            .await
            .expect("Failed to bind"),
        router,
    )
    .await
    .expect("Failed to start server");
}

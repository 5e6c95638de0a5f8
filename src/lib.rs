use std::sync::Arc;

use cache::{CacheStore, CustomerDataService};
use config::Config;
use crm::SystemOfRecord;

pub mod cache;
pub mod config;
pub mod crm;
pub mod error;
pub mod middleware;
pub mod result;
pub mod routes;
pub mod utils;

pub struct AppState<S> {
    pub config: Config,
    pub cache: Arc<CustomerDataService<S>>,
    pub crm: Arc<dyn SystemOfRecord>,
}

impl<S: CacheStore> AppState<S> {
    pub fn new(
        config: Config,
        cache: CustomerDataService<S>,
        crm: Arc<dyn SystemOfRecord>,
    ) -> Self {
        Self {
            config,
            cache: Arc::new(cache),
            crm,
        }
    }
}

// 派生的 Clone 会要求 S: Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            cache: Arc::clone(&self.cache),
            crm: Arc::clone(&self.crm),
        }
    }
}

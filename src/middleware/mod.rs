mod auth;
mod error_handler;

pub use auth::{auth_middleware, bearer_claims};
pub use error_handler::log_errors;

mod handler;
mod model;

pub use handler::{login, logoff};
pub use model::{LoginRequest, LoginResponse, LogoffResponse};

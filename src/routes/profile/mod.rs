mod handler;
mod model;

pub use handler::my_profile;
pub use model::{MyProfileResponse, ProfileQuery};

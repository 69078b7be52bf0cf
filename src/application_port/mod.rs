mod api_error;
mod auth_service;
mod farm_service;

pub use api_error::*;
pub use auth_service::*;
pub use farm_service::*;

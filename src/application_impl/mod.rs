mod auth_service_fake;
mod auth_service_impl;
mod auth_state;
mod farm_service_impl;

pub use auth_service_fake::*;
pub use auth_service_impl::*;
pub use auth_state::*;
pub use farm_service_impl::*;

mod credential;
mod farm;
mod page;
mod request;
mod user;

pub use credential::*;
pub use farm::*;
pub use page::*;
pub use request::*;
pub use user::*;

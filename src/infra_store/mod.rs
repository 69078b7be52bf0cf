mod file_token_store;
mod memory_token_store;
mod noop_token_store;
mod snapshot_store_impl;

pub use file_token_store::*;
pub use memory_token_store::*;
pub use noop_token_store::*;
pub use snapshot_store_impl::*;

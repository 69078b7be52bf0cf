mod snapshot_store;
mod token_store;
mod transport;

pub use snapshot_store::*;
pub use token_store::*;
pub use transport::*;

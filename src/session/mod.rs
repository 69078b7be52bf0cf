mod refresh;
mod session_manager;

pub use refresh::RefreshOutcome;
pub use session_manager::*;

//! Settings are layered: built-in defaults, then the TOML file, then
//! `AGRICONNECT_*` environment variables, then `AGRICONNECT_API_URL`.

mod cli;
pub use clap::{Parser, Subcommand};
pub use cli::*;

mod settings;
pub use settings::*;

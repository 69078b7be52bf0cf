use super::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "agriconnect", about = "AgriConnect API client")]
pub struct Cli {
    #[arg(long)]
    pub settings: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and store the session credentials
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone_number: Option<String>,
        #[arg(long)]
        role: Option<String>,
    },
    /// Show the signed-in user
    Me,
    /// Forget the stored credentials
    Logout,
    /// Request a password reset e-mail
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Show the persisted session snapshot
    Status,
    Farms,
    Fields {
        #[arg(long)]
        farm: i64,
    },
    Activities {
        #[arg(long)]
        field: i64,
    },
}

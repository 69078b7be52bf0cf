use agriconnect::application_port::*;
use agriconnect::client::Client;
use agriconnect::domain_model::Role;
use agriconnect::logger::*;
use agriconnect::settings::*;
use serde::Serialize;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    debug!(?project_settings);
    logger.reload_from_config(&LogConfig::from(&project_settings.log))?;

    let client = Client::try_new(&project_settings)?;

    match run(&client, cli.command).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            if e == ApiError::SessionExpired {
                client.auth_state.set_user(None);
            }
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), ApiError> {
    let text = serde_json::to_string_pretty(value).map_err(ApiError::encode)?;
    println!("{}", text);
    Ok(())
}

async fn run(client: &Client, command: Command) -> Result<(), ApiError> {
    match command {
        Command::Login { email, password } => {
            let result = client.auth_state.login(LoginInput { email, password }).await?;
            print_json(&result.user)
        }
        Command::Register {
            email,
            password,
            first_name,
            last_name,
            phone_number,
            role,
        } => {
            let role = role
                .map(|r| r.parse::<Role>())
                .transpose()
                .map_err(|message| ApiError::Request {
                    status: None,
                    message,
                })?;
            let user = client
                .auth_service
                .register(RegisterInput {
                    email,
                    confirm_password: password.clone(),
                    password,
                    first_name,
                    last_name,
                    phone_number,
                    role,
                })
                .await?;
            print_json(&user)
        }
        Command::Me => {
            let user = client.auth_state.check_auth().await?;
            print_json(&user)
        }
        Command::Logout => {
            client.auth_state.logout().await;
            info!("signed out");
            Ok(())
        }
        Command::ResetPassword { email } => {
            let result = client.auth_service.reset_password(&email).await?;
            print_json(&result)
        }
        Command::Status => {
            let tokens = client.session.token_pair();
            print_json(&serde_json::json!({
                "snapshot": client.auth_state.snapshot(),
                "has_access_token": tokens.access.is_some(),
                "has_refresh_token": tokens.refresh.is_some(),
            }))
        }
        Command::Farms => print_json(&client.farm_service.list_farms().await?),
        Command::Fields { farm } => print_json(&client.farm_service.list_fields(farm).await?),
        Command::Activities { field } => {
            print_json(&client.farm_service.list_activities(field).await?)
        }
    }
}

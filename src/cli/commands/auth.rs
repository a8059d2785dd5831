use clap::Subcommand;
use serde_json::json;

use crate::cli::client::ApiClient;
use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::utils::{output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Login to server")]
    Login {
        #[arg(help = "Account name")]
        name: String,
        #[arg(long, help = "Password")]
        password: String,
    },

    #[command(about = "Logout from server")]
    Logout,

    #[command(about = "Show current authentication status")]
    Status,

    #[command(about = "Show current account information")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { name, password } => {
            let mut config = load_cli_config()?;
            let client = ApiClient::new(&config.server_url, None)?;

            let data = client
                .post("/v1/login", &json!({ "name": name, "password": password }))
                .await?;
            let token = data
                .get("token")
                .and_then(|t| t.as_str())
                .ok_or_else(|| anyhow::anyhow!("login response carried no token"))?
                .to_string();

            config.set_session(name.clone(), token);
            save_cli_config(&config)?;

            output_success(
                &output_format,
                &format!("Logged in as {}", name),
                Some(json!({ "user": name, "server_url": config.server_url })),
            )
        }
        AuthCommands::Logout => {
            let mut config = load_cli_config()?;

            if config.token.is_some() {
                let client = ApiClient::from_config(&config)?;
                // The local session is dropped even when the server is gone
                if let Err(e) = client.post("/v1/logout", &json!({})).await {
                    tracing::warn!(error = %e, "Server-side logout failed");
                }
            }

            config.clear_session();
            save_cli_config(&config)?;

            output_success(&output_format, "Logged out", None)
        }
        AuthCommands::Status => {
            let config = load_cli_config()?;
            output_record(
                &output_format,
                &json!({
                    "server_url": config.server_url,
                    "authenticated": config.token.is_some(),
                    "user": config.user,
                    "logged_in_at": config.logged_in_at,
                }),
            )
        }
        AuthCommands::Whoami => {
            let config = load_cli_config()?;
            let client = ApiClient::from_config(&config)?;
            let account = client.get("/v1/whoami").await?;
            output_record(&output_format, &account)
        }
    }
}

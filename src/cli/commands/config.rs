use clap::Subcommand;
use serde_json::json;
use url::Url;

use crate::cli::config::{load_cli_config, save_cli_config};
use crate::cli::utils::{output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Set the API server URL")]
    SetUrl {
        #[arg(help = "Server URL, e.g. http://127.0.0.1:3000")]
        url: String,
    },

    #[command(about = "Show the current client configuration")]
    Show,
}

pub async fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::SetUrl { url } => {
            let parsed = Url::parse(&url).map_err(|e| anyhow::anyhow!("invalid server URL '{}': {}", url, e))?;
            let server_url = parsed.as_str().trim_end_matches('/').to_string();

            let mut config = load_cli_config()?;
            if config.server_url != server_url {
                // A token is only meaningful to the server that issued it
                config.clear_session();
            }
            config.server_url = server_url.clone();
            save_cli_config(&config)?;

            output_success(
                &output_format,
                &format!("Server set to {}", server_url),
                Some(json!({ "server_url": server_url })),
            )
        }
        ConfigCommands::Show => {
            let config = load_cli_config()?;
            output_record(
                &output_format,
                &json!({
                    "server_url": config.server_url,
                    "user": config.user,
                    "logged_in": config.token.is_some(),
                    "logged_in_at": config.logged_in_at,
                }),
            )
        }
    }
}

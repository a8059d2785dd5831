use clap::Subcommand;
use serde_json::{json, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::load_cli_config;
use crate::cli::utils::{field, output_empty_collection, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum AccountCommands {
    #[command(about = "List all accounts")]
    List,

    #[command(about = "Show one account")]
    Get {
        #[arg(help = "Account id")]
        id: i64,
    },

    #[command(about = "Create an account (admin only)")]
    Create {
        #[arg(help = "Account name")]
        name: String,
        #[arg(long, help = "Password")]
        password: String,
        #[arg(long = "type", default_value = "user", value_parser = ["admin", "user"], help = "Account type")]
        account_type: String,
    },

    #[command(about = "Delete an account (admin only)")]
    Delete {
        #[arg(help = "Account id")]
        id: i64,
    },
}

pub async fn handle(cmd: AccountCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_config(&load_cli_config()?)?;

    match cmd {
        AccountCommands::List => {
            let accounts = client.get("/v1/accounts").await?;
            let rows = accounts.as_array().cloned().unwrap_or_default();

            if rows.is_empty() {
                return output_empty_collection(&output_format, "accounts", "No accounts");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "accounts": rows }))?);
                }
                OutputFormat::Text => print_accounts(&rows),
            }
            Ok(())
        }
        AccountCommands::Get { id } => {
            let account = client.get_query("/v1/account", &[("id", id)]).await?;
            output_record(&output_format, &account)
        }
        AccountCommands::Create {
            name,
            password,
            account_type,
        } => {
            let account = client
                .post(
                    "/v1/account",
                    &json!({ "name": name, "password": password, "type": account_type }),
                )
                .await?;

            output_success(
                &output_format,
                &format!("Account '{}' created with id {}", name, field(&account, "id")),
                Some(json!({ "account": account })),
            )
        }
        AccountCommands::Delete { id } => {
            client.delete("/v1/account", &json!({ "id": id })).await?;
            output_success(&output_format, &format!("Account {} deleted", id), Some(json!({ "id": id })))
        }
    }
}

fn print_accounts(rows: &[Value]) {
    println!("{:<6} {:<20} {:<8} {}", "ID", "NAME", "TYPE", "CREATED");
    println!("{}", "-".repeat(60));

    for account in rows {
        println!(
            "{:<6} {:<20} {:<8} {}",
            field(account, "id"),
            field(account, "name"),
            field(account, "type"),
            field(account, "created_at")
        );
    }
}

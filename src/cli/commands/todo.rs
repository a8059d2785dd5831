use clap::Subcommand;
use serde_json::{json, Map, Value};

use crate::cli::client::ApiClient;
use crate::cli::config::load_cli_config;
use crate::cli::utils::{field, output_empty_collection, output_record, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum TodoCommands {
    #[command(about = "List all todos")]
    List,

    #[command(about = "Show one todo")]
    Get {
        #[arg(help = "Todo id")]
        id: i64,
    },

    #[command(about = "Create a todo owned by the current account")]
    Create {
        #[arg(help = "Todo name")]
        name: String,
        #[arg(long, help = "Description")]
        desc: String,
    },

    #[command(about = "Update a todo; only the given fields change")]
    Update {
        #[arg(help = "Todo id")]
        id: i64,
        #[arg(long, help = "New name")]
        name: Option<String>,
        #[arg(long, help = "New description")]
        desc: Option<String>,
        #[arg(long, value_parser = ["open", "done"], help = "New status")]
        status: Option<String>,
    },

    #[command(about = "Delete a todo")]
    Delete {
        #[arg(help = "Todo id")]
        id: i64,
    },
}

pub async fn handle(cmd: TodoCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::from_config(&load_cli_config()?)?;

    match cmd {
        TodoCommands::List => {
            let todos = client.get("/v1/todos").await?;
            let rows = todos.as_array().cloned().unwrap_or_default();

            if rows.is_empty() {
                return output_empty_collection(&output_format, "todos", "No todos");
            }

            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({ "todos": rows }))?);
                }
                OutputFormat::Text => print_todos(&rows),
            }
            Ok(())
        }
        TodoCommands::Get { id } => {
            let todo = client.get_query("/v1/todo", &[("id", id)]).await?;
            output_record(&output_format, &todo)
        }
        TodoCommands::Create { name, desc } => {
            let todo = client.post("/v1/todo", &json!({ "name": name, "desc": desc })).await?;
            output_success(
                &output_format,
                &format!("Todo {} created", field(&todo, "id")),
                Some(json!({ "todo": todo })),
            )
        }
        TodoCommands::Update { id, name, desc, status } => {
            let body = update_body(id, name, desc, status);
            client.put("/v1/todo", &body).await?;
            output_success(&output_format, &format!("Todo {} updated", id), Some(json!({ "id": id })))
        }
        TodoCommands::Delete { id } => {
            client.delete("/v1/todo", &json!({ "id": id })).await?;
            output_success(&output_format, &format!("Todo {} deleted", id), Some(json!({ "id": id })))
        }
    }
}

/// Only the flags that were given end up in the body
fn update_body(id: i64, name: Option<String>, desc: Option<String>, status: Option<String>) -> Value {
    let mut body = Map::new();
    body.insert("id".to_string(), json!(id));
    if let Some(name) = name {
        body.insert("name".to_string(), json!(name));
    }
    if let Some(desc) = desc {
        body.insert("desc".to_string(), json!(desc));
    }
    if let Some(status) = status {
        body.insert("status".to_string(), json!(status));
    }
    Value::Object(body)
}

fn print_todos(rows: &[Value]) {
    println!("{:<6} {:<7} {:<6} {:<24} {}", "ID", "OWNER", "STATUS", "NAME", "DESC");
    println!("{}", "-".repeat(80));

    for todo in rows {
        println!(
            "{:<6} {:<7} {:<6} {:<24} {}",
            field(todo, "id"),
            field(todo, "owner_id"),
            field(todo, "status"),
            field(todo, "name"),
            field(todo, "desc")
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_body_only_carries_given_fields() {
        let body = update_body(3, None, None, Some("done".to_string()));
        assert_eq!(body, json!({ "id": 3, "status": "done" }));
    }
}

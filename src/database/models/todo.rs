use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::database::manager::DatabaseError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    #[default]
    Open,
    Done,
}

impl TodoStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::Open => "open",
            TodoStatus::Done => "done",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TodoStatus::Open),
            "done" => Ok(TodoStatus::Done),
            other => Err(format!("unknown todo status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub desc: String,
    pub status: TodoStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTodo {
    pub owner_id: i64,
    pub name: String,
    pub desc: String,
}

/// Sparse update: `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub id: i64,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub status: Option<TodoStatus>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.desc.is_none() && self.status.is_none()
    }

    /// Applies the present fields to `todo` in place.
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(name) = &self.name {
            todo.name = name.clone();
        }
        if let Some(desc) = &self.desc {
            todo.desc = desc.clone();
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
    }
}

#[derive(Debug, FromRow)]
pub struct TodoRow {
    pub id: i64,
    pub owner_id: i64,
    pub name: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<TodoRow> for Todo {
    type Error = DatabaseError;

    fn try_from(row: TodoRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse()
            .map_err(|e| DatabaseError::InvalidRow(format!("todo {}: {}", row.id, e)))?;

        Ok(Todo {
            id: row.id,
            owner_id: row.owner_id,
            name: row.name,
            desc: row.description,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

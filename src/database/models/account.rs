use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::database::manager::DatabaseError;

/// Role of an account. Admins manage accounts and may mutate any todo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Admin,
    User,
}

impl AccountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Admin => "admin",
            AccountType::User => "user",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(AccountType::Admin),
            "user" => Ok(AccountType::User),
            other => Err(format!("unknown account type '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn is_admin(&self) -> bool {
        self.account_type == AccountType::Admin
    }
}

/// Insert payload; the password is already hashed by the service layer.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub password_hash: String,
    pub account_type: AccountType,
}

#[derive(Debug, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub password_hash: String,
    pub account_type: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<AccountRow> for Account {
    type Error = DatabaseError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let account_type = row
            .account_type
            .parse()
            .map_err(|e| DatabaseError::InvalidRow(format!("account {}: {}", row.id, e)))?;

        Ok(Account {
            id: row.id,
            name: row.name,
            password_hash: row.password_hash,
            account_type,
            created_at: row.created_at,
        })
    }
}

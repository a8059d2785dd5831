use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub notification: NotificationConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Paths served without a session token
    pub allow_list: Vec<String>,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: Option<String>,
    pub max_connections: u32,
    pub connect_attempts: u32,
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub bootstrap_admin_name: Option<String>,
    #[serde(skip_serializing)]
    pub bootstrap_admin_password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub webhook_url: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("SERVER_HOST") {
            self.server.host = v;
        }
        if let Some(v) = env::var("SERVER_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("SERVER_ALLOW_LIST") {
            self.server.allow_list = split_list(&v);
        }
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            self.database.backend = match v.to_ascii_lowercase().as_str() {
                "memory" | "mem" => StorageBackend::Memory,
                "postgres" | "pg" => StorageBackend::Postgres,
                _ => self.database.backend,
            };
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_ATTEMPTS") {
            self.database.connect_attempts = v.parse().unwrap_or(self.database.connect_attempts);
        }
        if let Ok(v) = env::var("DATABASE_CONNECT_TIMEOUT_SECS") {
            self.database.connect_timeout_secs = v.parse().unwrap_or(self.database.connect_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("BOOTSTRAP_ADMIN_NAME") {
            self.security.bootstrap_admin_name = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("BOOTSTRAP_ADMIN_PASSWORD") {
            self.security.bootstrap_admin_password = Some(v).filter(|s| !s.is_empty());
        }

        // Notification overrides
        if let Ok(v) = env::var("NOTIFY_WEBHOOK_URL") {
            self.notification.webhook_url = Some(v).filter(|s| !s.is_empty());
        }
        if let Ok(v) = env::var("NOTIFY_TIMEOUT_SECS") {
            self.notification.timeout_secs = v.parse().unwrap_or(self.notification.timeout_secs);
        }

        if let Ok(v) = env::var("LOG_LEVEL") {
            self.log.level = v;
        }

        self
    }

    /// Bootstrap administrator credentials, only when both halves are set.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (
            self.security.bootstrap_admin_name.as_deref(),
            self.security.bootstrap_admin_password.as_deref(),
        ) {
            (Some(name), Some(password)) => Some((name, password)),
            _ => None,
        }
    }

    fn default_allow_list() -> Vec<String> {
        vec!["/".to_string(), "/health".to_string(), "/v1/login".to_string()]
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
                allow_list: Self::default_allow_list(),
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Memory,
                url: None,
                max_connections: 5,
                connect_attempts: 3,
                connect_timeout_secs: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                bootstrap_admin_name: Some("root".to_string()),
                bootstrap_admin_password: Some("root".to_string()),
            },
            notification: NotificationConfig {
                webhook_url: None,
                timeout_secs: 5,
            },
            log: LogConfig {
                level: "debug".to_string(),
            },
        }
    }

    pub fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                allow_list: Self::default_allow_list(),
                enable_request_logging: true,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 10,
                connect_attempts: 10,
                connect_timeout_secs: 1,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
                bootstrap_admin_name: None,
                bootstrap_admin_password: None,
            },
            notification: NotificationConfig {
                webhook_url: None,
                timeout_secs: 5,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
                allow_list: Self::default_allow_list(),
                enable_request_logging: false,
            },
            database: DatabaseConfig {
                backend: StorageBackend::Postgres,
                url: None,
                max_connections: 20,
                connect_attempts: 10,
                connect_timeout_secs: 2,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
                bootstrap_admin_name: None,
                bootstrap_admin_password: None,
            },
            notification: NotificationConfig {
                webhook_url: None,
                timeout_secs: 3,
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

use std::time::Duration;

use serde::Deserialize;

use crate::accounts::password::PasswordStorage;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub server: ServerConfig,
    pub password_storage: PasswordStorage,
    /// Cosmetic wait before a booking is reported as confirmed.
    pub processing_delay: Duration,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://users.db?mode=rwc".into());
        let server = ServerConfig {
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("APP_PORT")
                .ok()
                .and_then(|v| v.parse::<u16>().ok())
                .unwrap_or(4000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|_| {
                    vec![
                        "http://localhost:5173".into(),
                        "http://localhost:5174".into(),
                    ]
                }),
        };
        let password_storage = match std::env::var("PASSWORD_STORAGE") {
            Ok(v) => v.parse()?,
            Err(_) => PasswordStorage::Plaintext,
        };
        let processing_delay = Duration::from_millis(
            std::env::var("BOOKING_PROCESSING_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(1000),
        );
        Ok(Self {
            database_url,
            server,
            password_storage,
            processing_delay,
        })
    }

    /// Configuration for an in-memory database with no processing delay.
    pub fn for_tests() -> Self {
        Self {
            database_url: "sqlite::memory:".into(),
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 0,
                cors_origins: vec!["http://localhost:5173".into()],
            },
            password_storage: PasswordStorage::Plaintext,
            processing_delay: Duration::ZERO,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

//! Application configuration management
//!
//! This module handles loading and validating configuration from environment variables.
//! The configuration is built once in `main` and handed to [`crate::AppState`];
//! nothing reads the environment after startup.

use std::env;

use crate::constants::{
    DEFAULT_DATABASE_MAX_CONNECTIONS, DEFAULT_INVITATION_EXPIRY_DAYS, DEFAULT_JWT_EXPIRY_HOURS,
    DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    MIN_PASSWORD_LENGTH,
};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub cors: CorsConfig,
    pub tournament: TournamentConfig,
    /// Account promoted to the admin role at startup, when configured
    pub admin: Option<AdminConfig>,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub rust_log: String,
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// JWT authentication configuration
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiry_hours: i64,
    pub refresh_token_expiry_days: i64,
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    pub allowed_origins: Vec<String>,
}

/// Tournament workflow configuration
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    pub invitation_expiry_days: i64,
}

/// Bootstrap administrator (`ADMIN_USERNAME`, `ADMIN_PASSWORD`, `ADMIN_EMAIL`)
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            cors: CorsConfig::from_env(),
            tournament: TournamentConfig::from_env()?,
            admin: AdminConfig::from_parts(
                env::var("ADMIN_USERNAME").ok(),
                env::var("ADMIN_PASSWORD").ok(),
                env::var("ADMIN_EMAIL").ok(),
            )?,
        })
    }
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: env::var("SERVER_HOST").unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            port: parse_var("SERVER_PORT", DEFAULT_SERVER_PORT)?,
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

impl DatabaseConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL".to_string()))?,
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", DEFAULT_DATABASE_MAX_CONNECTIONS)?,
        })
    }
}

impl JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            secret: env::var("JWT_SECRET")
                .map_err(|_| ConfigError::Missing("JWT_SECRET".to_string()))?,
            expiry_hours: parse_var("JWT_EXPIRY_HOURS", DEFAULT_JWT_EXPIRY_HOURS)?,
            refresh_token_expiry_days: parse_var(
                "REFRESH_TOKEN_EXPIRY_DAYS",
                DEFAULT_REFRESH_TOKEN_EXPIRY_DAYS,
            )?,
        })
    }
}

impl CorsConfig {
    fn from_env() -> Self {
        Self {
            allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| parse_origins(&raw))
                .unwrap_or_default(),
        }
    }
}

impl TournamentConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Self::new(parse_var(
            "INVITATION_EXPIRY_DAYS",
            DEFAULT_INVITATION_EXPIRY_DAYS,
        )?)
    }

    fn new(invitation_expiry_days: i64) -> Result<Self, ConfigError> {
        if invitation_expiry_days <= 0 {
            return Err(ConfigError::InvalidValue("INVITATION_EXPIRY_DAYS".to_string()));
        }

        Ok(Self {
            invitation_expiry_days,
        })
    }
}

impl AdminConfig {
    /// Both username and password, or neither
    fn from_parts(
        username: Option<String>,
        password: Option<String>,
        email: Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let username = username.map(|u| u.trim().to_string()).filter(|u| !u.is_empty());
        let password = password.filter(|p| !p.is_empty());

        match (username, password) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ConfigError::Missing("ADMIN_PASSWORD".to_string())),
            (None, Some(_)) => Err(ConfigError::Missing("ADMIN_USERNAME".to_string())),
            (Some(username), Some(password)) => {
                if (password.chars().count() as u64) < MIN_PASSWORD_LENGTH {
                    return Err(ConfigError::InvalidValue("ADMIN_PASSWORD".to_string()));
                }
                let email = email
                    .map(|e| e.trim().to_string())
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| format!("{username}@clubhouse.local"));

                Ok(Some(Self {
                    username,
                    email,
                    password,
                }))
            }
        }
    }
}

/// Read an optional variable, falling back to `default` when unset
fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    parse_value(name, env::var(name).ok().as_deref(), default)
}

fn parse_value<T>(name: &str, raw: Option<&str>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
{
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        None => Ok(default),
    }
}

/// Split a comma-separated origin list, dropping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_reads_and_rejects() {
        assert_eq!(parse_value("SERVER_PORT", Some(" 9090 "), DEFAULT_SERVER_PORT).unwrap(), 9090);
        assert_eq!(parse_value("SERVER_PORT", None, DEFAULT_SERVER_PORT).unwrap(), 8080);

        match parse_value::<u16>("SERVER_PORT", Some("eighty"), DEFAULT_SERVER_PORT) {
            Err(ConfigError::InvalidValue(name)) => assert_eq!(name, "SERVER_PORT"),
            other => panic!("expected InvalidValue, got {other:?}"),
        }
        assert!(parse_value::<u16>("SERVER_PORT", Some("70000"), DEFAULT_SERVER_PORT).is_err());
    }

    #[test]
    fn test_invitation_expiry_must_be_positive() {
        assert_eq!(TournamentConfig::new(3).unwrap().invitation_expiry_days, 3);
        assert!(matches!(
            TournamentConfig::new(0),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            TournamentConfig::new(-7),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_admin_config_from_parts() {
        assert!(AdminConfig::from_parts(None, None, None).unwrap().is_none());

        let admin = AdminConfig::from_parts(
            Some(" boss ".to_string()),
            Some("long-enough-secret".to_string()),
            None,
        )
        .unwrap()
        .unwrap();
        assert_eq!(admin.username, "boss");
        assert_eq!(admin.email, "boss@clubhouse.local");

        assert!(matches!(
            AdminConfig::from_parts(Some("boss".to_string()), None, None),
            Err(ConfigError::Missing(_))
        ));
        assert!(matches!(
            AdminConfig::from_parts(None, Some("long-enough-secret".to_string()), None),
            Err(ConfigError::Missing(_))
        ));
        assert!(matches!(
            AdminConfig::from_parts(Some("boss".to_string()), Some("short".to_string()), None),
            Err(ConfigError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("https://club.example, http://localhost:3000 ,,"),
            vec!["https://club.example", "http://localhost:3000"]
        );
        assert!(parse_origins("  ").is_empty());
    }

    #[test]
    fn test_parse_var_falls_back_when_unset() {
        let value: i64 = parse_var("CLUBHOUSE_TEST_SURELY_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }
}

//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_JWT_EXPIRATION_HOURS, DEFAULT_PASSWORD_MEMORY_COST,
    DEFAULT_PASSWORD_PARALLELISM, DEFAULT_PASSWORD_TIME_COST, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT, DEV_PASSWORD_SECRET, MIN_JWT_SECRET_LENGTH,
};

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Argon2id parameters shared by account creation, password changes and login.
#[derive(Clone)]
pub struct PasswordSettings {
    secret: String,
    pub time_cost: u32,
    pub parallelism: u32,
    pub memory_cost: u32,
}

impl PasswordSettings {
    pub fn new(secret: impl Into<String>, time_cost: u32, parallelism: u32, memory_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            time_cost,
            parallelism,
            memory_cost,
        }
    }

    /// Keyed input mixed into every hash and verification.
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.as_bytes()
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self::new(
            DEV_PASSWORD_SECRET,
            DEFAULT_PASSWORD_TIME_COST,
            DEFAULT_PASSWORD_PARALLELISM,
            DEFAULT_PASSWORD_MEMORY_COST,
        )
    }
}

impl std::fmt::Debug for PasswordSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordSettings")
            .field("secret", &"[REDACTED]")
            .field("time_cost", &self.time_cost)
            .field("parallelism", &self.parallelism)
            .field("memory_cost", &self.memory_cost)
            .finish()
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub password: PasswordSettings,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("jwt_expiration_hours", &self.jwt_expiration_hours)
            .field("password", &self.password)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Default for Config {
    /// Development defaults, no environment access.
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            password: PasswordSettings::default(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Panics
    /// Panics in release builds if JWT_SECRET or PASSWORD_SECRET is missing,
    /// and whenever JWT_SECRET is too short.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let jwt_secret = required_secret("JWT_SECRET", DEV_JWT_SECRET);

        // Validate JWT secret length
        if jwt_secret.len() < MIN_JWT_SECRET_LENGTH {
            panic!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            );
        }

        let password = PasswordSettings::new(
            required_secret("PASSWORD_SECRET", DEV_PASSWORD_SECRET),
            parsed_var("PASSWORD_TIME_COST").unwrap_or(DEFAULT_PASSWORD_TIME_COST),
            parsed_var("PASSWORD_PARALLELISM").unwrap_or(DEFAULT_PASSWORD_PARALLELISM),
            parsed_var("PASSWORD_MEMORY_COST").unwrap_or(DEFAULT_PASSWORD_MEMORY_COST),
        );

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            jwt_secret,
            jwt_expiration_hours: parsed_var("JWT_EXPIRATION_HOURS")
                .unwrap_or(DEFAULT_JWT_EXPIRATION_HOURS),
            password,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parsed_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    /// Get JWT secret bytes for token signing/verification.
    pub fn jwt_secret_bytes(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn required_secret(name: &str, dev_default: &str) -> String {
    env::var(name).unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            tracing::warn!("{} not set, using insecure default for development", name);
            dev_default.to_string()
        } else {
            panic!("{} environment variable must be set in production", name);
        }
    })
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_secrets() {
        let config = Config::default();
        let rendered = format!("{:?}", config);

        assert!(rendered.contains("[REDACTED]"));
        assert!(!rendered.contains(DEV_JWT_SECRET));
        assert!(!rendered.contains(DEV_PASSWORD_SECRET));
    }

    #[test]
    fn test_server_addr() {
        let config = Config::default();
        assert_eq!(config.server_addr(), "0.0.0.0:3000");
    }
}

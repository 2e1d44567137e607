//! Environment-driven server configuration.
//!
//! Configuration is read once at startup and fails fast with a clear
//! message; nothing else in the crate touches the process environment.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::outbound::steam::DEFAULT_STEAM_BASE_URL;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Configuration failures surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable was present but unparseable.
    #[error("invalid {name}: {message}")]
    Invalid { name: &'static str, message: String },
    /// The signing secret is required outside debug builds.
    #[error("{name} must be set in release builds")]
    MissingSecret { name: &'static str },
}

/// Resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    /// PostgreSQL connection string; absent means in-memory persistence.
    pub database_url: Option<String>,
    /// HS256 signing secret for bearer credentials.
    pub jwt_secret: Vec<u8>,
    /// Base URL of the Steam Community endpoint.
    pub steam_base_url: String,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_owned())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                name: "BIND_ADDR",
                message: err.to_string(),
            })?;

        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());
        if database_url.is_none() {
            warn!("DATABASE_URL not set, using in-memory persistence");
        }

        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret.into_bytes(),
            _ if cfg!(debug_assertions) => {
                warn!("JWT_SECRET not set, using an ephemeral secret (dev only)");
                Uuid::new_v4().to_string().into_bytes()
            }
            _ => return Err(ConfigError::MissingSecret { name: "JWT_SECRET" }),
        };

        let steam_base_url = env::var("STEAM_BASE_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| DEFAULT_STEAM_BASE_URL.to_owned());

        Ok(Self {
            bind_addr,
            database_url,
            jwt_secret,
            steam_base_url,
        })
    }
}

use std::{env, net::SocketAddr, str::FromStr};

use anyhow::Context;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").context("DATABASE_URL must point at the boutique database")?;
        Ok(Self {
            database_url,
            host: env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: var_or("APP_PORT", 3000),
            max_connections: var_or("DATABASE_MAX_CONNECTIONS", 10),
        })
    }

    pub fn bind_addr(&self) -> anyhow::Result<SocketAddr> {
        let ip = self
            .host
            .parse::<std::net::IpAddr>()
            .with_context(|| format!("APP_HOST `{}` is not an IP address", self.host))?;
        Ok(SocketAddr::from((ip, self.port)))
    }
}

/// Unset falls back silently; an unparsable value falls back with a warning.
fn var_or<T: FromStr + std::fmt::Display>(name: &str, default: T) -> T {
    let Ok(raw) = env::var(name) else {
        return default;
    };
    raw.trim().parse().unwrap_or_else(|_| {
        tracing::warn!(var = name, value = %raw, %default, "ignoring unparsable setting");
        default
    })
}

//! Service configuration from the environment.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub database_max_connections: u32,
    pub log_level: String,
    /// Used when no tariff period governs the check-in night
    pub default_deposit_percentage: Decimal,
    pub template_cache_ttl: Duration,
}

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_DEPOSIT_PERCENTAGE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const DEFAULT_TEMPLATE_CACHE_TTL_SECS: u64 = 600;

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL must be set")?;

        let config = Self {
            database_url,
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            database_max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_MAX_CONNECTIONS,
            )?,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            default_deposit_percentage: parse_or(
                &lookup,
                "DEFAULT_DEPOSIT_PERCENTAGE",
                DEFAULT_DEPOSIT_PERCENTAGE,
            )?,
            template_cache_ttl: Duration::from_secs(parse_or(
                &lookup,
                "TEMPLATE_CACHE_TTL_SECS",
                DEFAULT_TEMPLATE_CACHE_TTL_SECS,
            )?),
        };

        if config.default_deposit_percentage < Decimal::ZERO
            || config.default_deposit_percentage > Decimal::ONE_HUNDRED
        {
            anyhow::bail!(
                "DEFAULT_DEPOSIT_PERCENTAGE must be between 0 and 100, got {}",
                config.default_deposit_percentage
            );
        }

        if config.template_cache_ttl.is_zero() {
            anyhow::bail!("TEMPLATE_CACHE_TTL_SECS must be positive");
        }

        Ok(config)
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid listen address {}:{}", self.host, self.port))
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid {}={:?}: {}", key, raw, e)),
        None => Ok(default),
    }
}

//! Service configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `HOST` - Bind address (default: 0.0.0.0)
//! - `PORT` - Listen port (default: 8000)
//! - `TAX_RATE_BPS` - Default tax rate in basis points (default: 825, i.e. 8.25%)
//! - `DELIVERY_FEE_CENTS` - Default delivery fee (default: 499)
//! - `CART_DIR` - Persist carts as JSON files under this directory; in memory when unset
//! - `SEED_FILE` - JSON seed for the in-memory backend (default: `data/seed.json` if found)
//! - `LOG_FORMAT` - `text` or `json` (default: text)

use std::env;
use std::fmt::Display;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use crate::cart::Pricing;
use crate::models::Restaurant;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub tax_rate_bps: u32,
    pub delivery_fee_cents: u64,
    pub cart_dir: Option<PathBuf>,
    pub seed_file: Option<PathBuf>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            tax_rate_bps: 825,
            delivery_fee_cents: 499,
            cart_dir: None,
            seed_file: None,
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        // A missing .env file is normal outside development
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            host: try_load(&lookup, "HOST", defaults.host)?,
            port: try_load(&lookup, "PORT", defaults.port)?,
            tax_rate_bps: try_load(&lookup, "TAX_RATE_BPS", defaults.tax_rate_bps)?,
            delivery_fee_cents: try_load(&lookup, "DELIVERY_FEE_CENTS", defaults.delivery_fee_cents)?,
            cart_dir: lookup("CART_DIR").filter(|v| !v.is_empty()).map(PathBuf::from),
            seed_file: lookup("SEED_FILE").filter(|v| !v.is_empty()).map(PathBuf::from),
            log_format: try_load(&lookup, "LOG_FORMAT", defaults.log_format)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Pricing for a restaurant, honouring its overrides.
    pub fn pricing_for(&self, restaurant: &Restaurant) -> Pricing {
        Pricing {
            tax_rate_bps: restaurant.tax_rate_bps.unwrap_or(self.tax_rate_bps),
            delivery_fee_cents: restaurant
                .delivery_fee_cents
                .unwrap_or(self.delivery_fee_cents),
        }
    }
}

fn try_load<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + std::fmt::Debug,
    T::Err: Display,
{
    match lookup(key) {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: value.clone(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default:?}");
            Ok(default)
        }
    }
}

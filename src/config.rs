use std::env;
use std::str::FromStr;

use anyhow::{Context, bail};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageKind {
    MySql,
    Memory,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_addr: String,
    pub storage: StorageKind,
    pub database_url: Option<String>,

    /// Approved vacations a user may have per calendar year
    pub max_vacation_per_user: u32,
    /// Recorded as `resolvedBy` when a request is approved or rejected
    pub resolver_id: u64,

    // Rate limiting
    pub rate_per_min: u32,

    pub log_dir: String,
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let storage = match lookup("STORAGE").as_deref().map(str::trim) {
            None | Some("mysql") => StorageKind::MySql,
            Some("memory") => StorageKind::Memory,
            Some(other) => bail!("STORAGE must be 'mysql' or 'memory', got '{other}'"),
        };

        let database_url = lookup("DATABASE_URL");
        if storage == StorageKind::MySql && database_url.is_none() {
            bail!("DATABASE_URL must be set");
        }

        let max_vacation_per_user = parse_or(&lookup, "MAX_VACATION_PER_USER", 30u32)?;
        if max_vacation_per_user == 0 {
            bail!("MAX_VACATION_PER_USER must be positive");
        }

        Ok(Self {
            server_addr: lookup("SERVER_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            storage,
            database_url,
            max_vacation_per_user,
            resolver_id: parse_or(&lookup, "RESOLVER_ID", 1u64)?,
            rate_per_min: parse_or(&lookup, "RATE_PER_MIN", 1000u32)?,
            log_dir: lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
        })
    }
}

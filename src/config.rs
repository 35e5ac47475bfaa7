use std::{env, fmt::Display, str::FromStr};

use anyhow::anyhow;
use tracing::info;

pub struct AppConfig {
    /// Postgres connection string; absent means the server runs on the
    /// in-memory store.
    pub database_url: Option<String>,
    /// Single logical partition every vote record is stored under.
    pub namespace: String,
    pub db_pool_size: u32,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").ok(),
            namespace: load_or("RELAWAN_NAMESPACE", "default"),
            db_pool_size: try_load("RELAWAN_DB_POOL_SIZE", "5")?,
        })
    }
}

fn load_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> anyhow::Result<T>
where
    T::Err: Display,
{
    load_or(key, default)
        .parse()
        .map_err(|e| anyhow!("invalid {key} value: {e}"))
}

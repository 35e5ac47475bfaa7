use anyhow::Context;
use relawan_api::config::AppConfig;
use relawan_api::store::{MemoryRecordStore, PgRecordStore, RecordStore};
use relawan_api::AppState;
use sqlx::postgres::PgPoolOptions;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🗳 Starting relawan vote API");
    let config = AppConfig::load()?;

    let store: Box<dyn RecordStore> = match config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_pool_size)
                .connect(&url)
                .await
                .context("failed to connect to Postgres")?;

            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;
            info!("📋 Migrations complete");

            Box::new(PgRecordStore::new(pool, config.namespace))
        }
        None => {
            warn!("DATABASE_URL not set - vote records will be kept in memory only");
            Box::new(MemoryRecordStore::new())
        }
    };

    let _ = relawan_api::rocket(AppState::new(store))
        .launch()
        .await
        .context("server failed")?;

    Ok(())
}

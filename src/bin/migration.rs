use anyhow::{Context, Result};
use quotation_builder::{config, db};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load_config().context("failed to load configuration")?;
    config::init_tracing(cfg.log_level(), cfg.log_json);

    info!(environment = %cfg.environment, "Starting database migration");

    let pool = db::establish_connection_from_app_config(&cfg)
        .await
        .context("failed to connect to the database")?;
    db::check_connection(&pool)
        .await
        .context("database is not reachable")?;
    db::run_migrations(&pool)
        .await
        .context("failed to apply migrations")?;

    info!("Migration completed successfully");
    Ok(())
}

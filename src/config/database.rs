use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;
use tracing::{error, info};

/// Connects to PostgreSQL and applies pending migrations.
///
/// Schema and constraint setup (unique email, the compound enrollment key)
/// happens here, once at startup — never as a side effect of a write.
///
/// Exits the process with code 1 when the store is unreachable.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
        error!("DATABASE_URL must be set");
        std::process::exit(1);
    });

    let pool = match PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(err) => {
            error!(error = %err, "Failed to connect to database");
            std::process::exit(1);
        }
    };

    if let Err(err) = sqlx::migrate!().run(&pool).await {
        error!(error = %err, "Failed to run database migrations");
        std::process::exit(1);
    }

    info!("Database connected");
    pool
}

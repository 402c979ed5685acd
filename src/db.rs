// src/db.rs

use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

/// Opens the pool and applies the embedded migrations.
///
/// In-memory databases live as long as their connection, so they get a
/// single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let in_memory = database_url.contains(":memory:");
    let options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(5)
    };

    let pool = options.connect(database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Migrations applied successfully.");

    Ok(pool)
}

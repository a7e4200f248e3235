use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, migrate_db};

pub async fn run() -> Result<()> {
    let config = AppConfig::default();

    println!("Migrating db...");
    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        migrate_db(conn).unwrap_or_else(|err| eprintln!("DB migration failed {}", err));
        Ok(())
    })
    .await?;
    println!("Finished migrating db");

    Ok(())
}

use anyhow::Result;

use crate::core::AppConfig;
use crate::core::db::{async_db, initialize_db};

pub async fn run() -> Result<()> {
    let config = AppConfig::default();

    std::fs::create_dir_all(&config.upload_path)?;

    let db = async_db(&config.db_path).await?;
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await?;

    println!("Initialized storage at {}", config.storage_path);
    Ok(())
}

//! SQLite connection helpers and schema management.

use anyhow::Result;
use tokio_rusqlite::Connection;

/// Open the async db connection, creating the storage directory first.
pub async fn async_db(db_path: &str) -> Result<Connection> {
    std::fs::create_dir_all(db_path)?;
    let conn = Connection::open(format!("{}/lector.db", db_path)).await?;
    Ok(conn)
}

/// Create the schema if it doesn't already exist.
pub fn initialize_db(conn: &rusqlite::Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS interaction (
            id TEXT PRIMARY KEY,
            filename TEXT NOT NULL,
            intent TEXT NOT NULL,
            model TEXT NOT NULL,
            output TEXT NOT NULL,
            input_tokens INTEGER NOT NULL,
            output_tokens INTEGER NOT NULL,
            cost REAL NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS chat_message (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            interaction_id TEXT NOT NULL REFERENCES interaction(id),
            role TEXT NOT NULL,
            content TEXT NOT NULL,
            tokens INTEGER NOT NULL,
            cost REAL NOT NULL,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP
        );

        CREATE INDEX IF NOT EXISTS idx_chat_message_interaction
            ON chat_message (interaction_id, created_at);
        "#,
    )?;
    Ok(())
}

/// Apply schema migrations. Every statement is idempotent so migrating an
/// existing db is the same as initializing a fresh one.
pub fn migrate_db(conn: &rusqlite::Connection) -> Result<()> {
    initialize_db(conn)
}

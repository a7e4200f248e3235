//! Database queries for the chat API
use anyhow::{Error, Result};
use tokio_rusqlite::{Connection, params};

use super::public::{ChatMessage, Role};

/// Append a chat message and return it with its assigned row id.
pub async fn insert_chat_message(
    db: &Connection,
    interaction_id: &str,
    role: Role,
    content: &str,
    tokens: i64,
    cost: f64,
    created_at: &str,
) -> Result<ChatMessage, Error> {
    let i_id = interaction_id.to_owned();
    let text = content.to_owned();
    let ts = created_at.to_owned();
    let message = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                INSERT INTO chat_message
                    (interaction_id, role, content, tokens, cost, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )?;
            stmt.execute(params![i_id, role.as_str(), text, tokens, cost, ts])?;
            let id = conn.last_insert_rowid();
            Ok(ChatMessage {
                id,
                interaction_id: i_id,
                role,
                content: text,
                tokens,
                cost,
                created_at: ts,
            })
        })
        .await?;

    Ok(message)
}

/// Get an interaction's messages ordered by creation time.
pub async fn chat_thread(db: &Connection, interaction_id: &str) -> Result<Vec<ChatMessage>, Error> {
    let i_id = interaction_id.to_owned();
    let messages = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, interaction_id, role, content, tokens, cost, created_at
                FROM chat_message
                WHERE interaction_id = ?
                ORDER BY created_at, id
                "#,
            )?;
            let rows = stmt
                .query_map([i_id], |row| {
                    let role: String = row.get(2)?;
                    Ok(ChatMessage {
                        id: row.get(0)?,
                        interaction_id: row.get(1)?,
                        role: if role == "assistant" {
                            Role::Assistant
                        } else {
                            Role::User
                        },
                        content: row.get(3)?,
                        tokens: row.get(4)?,
                        cost: row.get(5)?,
                        created_at: row.get(6)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<ChatMessage>>();
            Ok(rows)
        })
        .await?;

    Ok(messages)
}

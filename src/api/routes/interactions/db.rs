//! Database queries for the interactions API
use anyhow::{Error, Result};
use tokio_rusqlite::{Connection, params};

use super::public::Interaction;

pub async fn insert_interaction(db: &Connection, interaction: &Interaction) -> Result<(), Error> {
    let record = interaction.clone();
    db.call(move |conn| {
        let mut stmt = conn.prepare(
            r#"
            INSERT INTO interaction
                (id, filename, intent, model, output, input_tokens, output_tokens, cost, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )?;
        stmt.execute(params![
            record.id,
            record.filename,
            record.intent,
            record.model,
            record.output,
            record.input_tokens,
            record.output_tokens,
            record.cost,
            record.created_at,
        ])?;
        Ok(())
    })
    .await?;

    Ok(())
}

pub async fn find_interaction_by_id(
    db: &Connection,
    id: &str,
) -> Result<Option<Interaction>, Error> {
    let id = id.to_owned();
    let result = db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, filename, intent, model, output,
                       input_tokens, output_tokens, cost, created_at
                FROM interaction
                WHERE id = ?
                LIMIT 1
                "#,
            )?;
            let mut rows = stmt.query_map([id], |row| {
                Ok(Interaction {
                    id: row.get(0)?,
                    filename: row.get(1)?,
                    intent: row.get(2)?,
                    model: row.get(3)?,
                    output: row.get(4)?,
                    input_tokens: row.get(5)?,
                    output_tokens: row.get(6)?,
                    cost: row.get(7)?,
                    created_at: row.get(8)?,
                })
            })?;
            Ok(rows.next().transpose()?)
        })
        .await?;

    Ok(result)
}

pub async fn interaction_count(db: &Connection) -> Result<i64, Error> {
    db.call(|conn| {
        let mut stmt = conn.prepare("SELECT COUNT(*) FROM interaction")?;
        let count: i64 = stmt.query_row([], |row| row.get(0))?;
        Ok(count)
    })
    .await
    .map_err(anyhow::Error::from)
}

pub async fn interaction_list(
    db: &Connection,
    limit: usize,
    offset: usize,
) -> Result<Vec<Interaction>, Error> {
    Ok(db
        .call(move |conn| {
            let mut stmt = conn.prepare(
                r#"
                SELECT id, filename, intent, model, output,
                       input_tokens, output_tokens, cost, created_at
                FROM interaction
                ORDER BY created_at DESC, id
                LIMIT ?1 OFFSET ?2
                "#,
            )?;
            let interaction_list = stmt
                .query_map(params![limit, offset], |row| {
                    Ok(Interaction {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        intent: row.get(2)?,
                        model: row.get(3)?,
                        output: row.get(4)?,
                        input_tokens: row.get(5)?,
                        output_tokens: row.get(6)?,
                        cost: row.get(7)?,
                        created_at: row.get(8)?,
                    })
                })?
                .filter_map(Result::ok)
                .collect::<Vec<_>>();
            Ok(interaction_list)
        })
        .await?)
}

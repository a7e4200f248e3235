//! Router for the chat API

use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;

use super::db as chat_db;
use super::public;
use crate::ai::prompt::{Prompt, templates};
use crate::api::routes::interactions::db as interactions_db;
use crate::api::state::AppState;
use crate::intent::estimate_tokens;

type SharedState = Arc<RwLock<AppState>>;

/// Append a user message to an interaction's thread and answer it with the
/// model runtime
async fn chat_handler(
    State(state): State<SharedState>,
    axum::Json(payload): axum::Json<public::ChatRequest>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, runtime, prices) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (
            shared_state.db.clone(),
            shared_state.runtime.clone(),
            shared_state.prices.clone(),
        )
    };

    let Some(interaction) =
        interactions_db::find_interaction_by_id(&db, &payload.interaction_id).await?
    else {
        return Ok((
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": format!("Interaction {} not found", payload.interaction_id)
            })),
        )
            .into_response());
    };

    let history = chat_db::chat_thread(&db, &interaction.id).await?;

    let registry = templates();
    let prompt = registry.render(
        &Prompt::FollowUp.to_string(),
        &json!({
            "output": interaction.output,
            "history": history
                .iter()
                .map(|message| {
                    json!({
                        "role": message.role.as_str(),
                        "content": message.content,
                    })
                })
                .collect::<Vec<_>>(),
            "question": payload.message,
        }),
    )?;

    let reply = runtime.generate(&interaction.model, &prompt).await?;

    // The user turn carries the input-side estimate of the full rendered
    // prompt, the assistant turn the output-side estimate of the reply
    let input_tokens = estimate_tokens(&prompt);
    let output_tokens = estimate_tokens(&reply);
    let input_cost = prices.estimate_cost(&interaction.model, input_tokens, 0)?;
    let output_cost = prices.estimate_cost(&interaction.model, 0, output_tokens)?;

    let now = Utc::now().to_rfc3339();
    chat_db::insert_chat_message(
        &db,
        &interaction.id,
        public::Role::User,
        &payload.message,
        i64::from(input_tokens),
        input_cost,
        &now,
    )
    .await?;
    let assistant = chat_db::insert_chat_message(
        &db,
        &interaction.id,
        public::Role::Assistant,
        &reply,
        i64::from(output_tokens),
        output_cost,
        &now,
    )
    .await?;

    Ok(axum::Json(assistant).into_response())
}

/// Get the chat thread for an interaction
async fn get_chat_thread(
    State(state): State<SharedState>,
    Path(interaction_id): Path<String>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read shared state").db.clone();

    if interactions_db::find_interaction_by_id(&db, &interaction_id)
        .await?
        .is_none()
    {
        return Ok((
            StatusCode::NOT_FOUND,
            axum::Json(json!({
                "error": format!("Interaction {} not found", interaction_id)
            })),
        )
            .into_response());
    }

    let messages = chat_db::chat_thread(&db, &interaction_id).await?;
    Ok(axum::Json(public::ChatThreadResponse {
        interaction_id,
        messages,
    })
    .into_response())
}

/// Create the chat router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(chat_handler))
        .route("/{interaction_id}", get(get_chat_thread))
}

//! Router for the interactions API

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use axum::{
    Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use axum_extra::extract::Query;
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::db as interactions_db;
use super::public;
use crate::api::state::AppState;
use crate::intent::{IntentId, estimate_tokens};

type SharedState = Arc<RwLock<AppState>>;

/// Replace anything outside [A-Za-z0-9.-_] so the stored name is safe as a
/// path segment and a URL
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

/// Upload a file and process it with the model runtime
async fn create_interaction(
    State(state): State<SharedState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let (db, config, runtime, intents, prices) = {
        let shared_state = state.read().expect("Unable to read shared state");
        (
            shared_state.db.clone(),
            shared_state.config.clone(),
            shared_state.runtime.clone(),
            shared_state.intents.clone(),
            shared_state.prices.clone(),
        )
    };

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut intent_field: Option<String> = None;
    let mut custom_prompt: Option<String> = None;
    let mut model_field: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                file = Some((file_name, field.bytes().await?.to_vec()));
            }
            Some("intent") => intent_field = Some(field.text().await?),
            Some("custom_prompt") => custom_prompt = Some(field.text().await?),
            Some("model") => model_field = Some(field.text().await?),
            _ => {}
        }
    }

    let (file_name, data) = file.ok_or(public::MissingFile)?;
    if data.len() > config.max_upload_bytes {
        return Err(public::UploadTooLarge {
            size: data.len(),
            limit: config.max_upload_bytes,
        }
        .into());
    }

    let intent_id = match intent_field.as_deref() {
        Some(value) => value.parse::<IntentId>()?,
        None => IntentId::GeneralOcr,
    };
    let model = model_field.unwrap_or_else(|| config.default_model.clone());

    // Validate the model before any work happens so a bad selection never
    // leaves a stored file behind
    prices.rates_for(&model)?;
    let prompt = intents.resolve_prompt(intent_id, custom_prompt.as_deref())?;

    let stored_name = format!("{}_{}", Uuid::new_v4(), sanitize_filename(&file_name));
    std::fs::create_dir_all(&config.upload_path)?;
    let file_path = PathBuf::from(&config.upload_path).join(&stored_name);
    std::fs::write(&file_path, &data)?;

    let output = runtime
        .generate_with_file(&model, &file_path, &prompt)
        .await?;

    let input_tokens = estimate_tokens(&prompt);
    let output_tokens = estimate_tokens(&output);
    let cost = prices.estimate_cost(&model, input_tokens, output_tokens)?;

    let interaction = public::Interaction {
        id: Uuid::new_v4().to_string(),
        filename: stored_name,
        intent: intent_id.to_string(),
        model,
        output,
        input_tokens: i64::from(input_tokens),
        output_tokens: i64::from(output_tokens),
        cost,
        created_at: Utc::now().to_rfc3339(),
    };
    interactions_db::insert_interaction(&db, &interaction).await?;

    Ok((StatusCode::CREATED, axum::Json(interaction)))
}

/// Get a list of all interactions, newest first
async fn list_interactions(
    State(state): State<SharedState>,
    Query(params): Query<public::InteractionsQuery>,
) -> Result<axum::Json<public::InteractionsResponse>, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read shared state").db.clone();
    let page = params.page.unwrap_or(1);
    let limit = params.limit.unwrap_or(20);
    let offset = (page - 1) * limit;
    let total_interactions = interactions_db::interaction_count(&db).await?;
    let paged = interactions_db::interaction_list(&db, limit, offset).await?;
    let total_pages = (total_interactions as f64 / limit as f64).ceil() as i64;

    Ok(axum::Json(public::InteractionsResponse {
        interactions: paged,
        page,
        limit,
        total_interactions,
        total_pages,
    }))
}

/// Get a single interaction by ID
async fn get_interaction(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, crate::api::public::ApiError> {
    let db = state.read().expect("Unable to read shared state").db.clone();

    match interactions_db::find_interaction_by_id(&db, &id).await? {
        Some(interaction) => Ok(axum::Json(interaction).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            axum::Json(json!({ "error": format!("Interaction {} not found", id) })),
        )
            .into_response()),
    }
}

/// Create the interactions router
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/", post(create_interaction).get(list_interactions))
        .route("/{id}", get(get_interaction))
}

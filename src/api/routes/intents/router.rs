//! Router for the intents API

use std::sync::{Arc, RwLock};

use axum::{Router, extract::State, response::Json, routing::get};

use super::public;
use crate::api::state::AppState;

type SharedState = Arc<RwLock<AppState>>;

/// List the intent catalog and supported models for the UI selectors
async fn list_intents(State(state): State<SharedState>) -> Json<public::IntentsResponse> {
    let shared_state = state.read().expect("Unable to read shared state");

    let intents = shared_state
        .intents
        .all()
        .iter()
        .map(|intent| public::IntentOption {
            id: intent.id.to_string(),
            label: intent.label.to_string(),
            grounded: intent.grounded,
        })
        .collect();
    let models = shared_state
        .prices
        .models()
        .iter()
        .map(|model| model.to_string())
        .collect();

    Json(public::IntentsResponse {
        intents,
        models,
        default_model: shared_state.config.default_model.clone(),
    })
}

/// Create the intents router
pub fn router() -> Router<SharedState> {
    Router::new().route("/", get(list_intents))
}

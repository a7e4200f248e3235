//! API routes module

pub mod chat;
pub mod intents;
pub mod interactions;

use std::sync::{Arc, RwLock};

use crate::api::state::AppState;
use axum::Router;

type SharedState = Arc<RwLock<AppState>>;

/// Create the combined API router
pub fn router() -> Router<SharedState> {
    Router::new()
        // Upload-and-process routes
        .nest("/interactions", interactions::router())
        // Follow-up chat routes
        .nest("/chat", chat::router())
        // Intent catalog and model listing for the UI selectors
        .nest("/intents", intents::router())
}

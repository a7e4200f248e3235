//! Public types for the intents API
use serde::Serialize;

#[derive(Serialize)]
pub struct IntentOption {
    pub id: String,
    pub label: String,
    pub grounded: bool,
}

#[derive(Serialize)]
pub struct IntentsResponse {
    pub intents: Vec<IntentOption>,
    pub models: Vec<String>,
    pub default_model: String,
}

//! Public types for the interactions API
use serde::{Deserialize, Serialize};

/// One completed upload-process-result cycle.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Interaction {
    pub id: String,
    pub filename: String,
    pub intent: String,
    pub model: String,
    pub output: String,
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cost: f64,
    pub created_at: String,
}

#[derive(Deserialize)]
pub struct InteractionsQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct InteractionsResponse {
    pub interactions: Vec<Interaction>,
    pub page: usize,
    pub limit: usize,
    pub total_interactions: i64,
    pub total_pages: i64,
}

#[derive(Debug, thiserror::Error)]
#[error("Upload of {size} bytes exceeds the {limit} byte limit")]
pub struct UploadTooLarge {
    pub size: usize,
    pub limit: usize,
}

#[derive(Debug, thiserror::Error)]
#[error("No file provided")]
pub struct MissingFile;

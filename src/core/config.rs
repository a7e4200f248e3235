use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub storage_path: String,
    pub db_path: String,
    pub upload_path: String,
    pub runtime_bin: String,
    pub default_model: String,
    pub runtime_timeout_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        let storage_path = env::var("LECTOR_STORAGE_PATH").unwrap_or("./".to_string());
        let db_path = format!("{}/db", storage_path);
        let upload_path = format!("{}/uploads", storage_path);
        let runtime_bin =
            env::var("LECTOR_RUNTIME_BIN").unwrap_or_else(|_| "ollama".to_string());
        let default_model =
            env::var("LECTOR_DEFAULT_MODEL").unwrap_or_else(|_| "deepseek-ocr".to_string());
        let runtime_timeout_secs = env::var("LECTOR_RUNTIME_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(120);
        let max_upload_bytes = env::var("LECTOR_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(16_000_000);

        Self {
            storage_path,
            db_path,
            upload_path,
            runtime_bin,
            default_model,
            runtime_timeout_secs,
            max_upload_bytes,
        }
    }
}

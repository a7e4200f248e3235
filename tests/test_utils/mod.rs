//! Test utilities for integration tests
use std::fs;
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::sync::{Arc, RwLock};

use axum::{Router, body::Body};

use lector::api::AppState;
use lector::api::app;
use lector::core::AppConfig;
use lector::core::db::{async_db, initialize_db};

pub const MULTIPART_BOUNDARY: &str = "lector-test-boundary";

/// A test application plus the temp directory backing its storage. Keep
/// the directory handle alive for the duration of the test.
pub struct TestApp {
    pub app: Router,
    // Held only to keep the storage directory alive
    pub _dir: tempfile::TempDir,
}

/// Creates a test application whose model runtime is a stub script that
/// prints a fixed response.
pub async fn test_app() -> TestApp {
    test_app_with_runtime("printf 'STUB MODEL OUTPUT'", 10).await
}

/// Creates a test application with a custom stub runtime script body and
/// timeout. The script stands in for the model CLI and receives the same
/// `run <model> <prompt>` arguments.
pub async fn test_app_with_runtime(script_body: &str, timeout_secs: u64) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");

    let db_path = dir.path().join("db");
    let upload_path = dir.path().join("uploads");
    fs::create_dir_all(&db_path).expect("Failed to create db directory");
    fs::create_dir_all(&upload_path).expect("Failed to create uploads directory");

    let runtime_bin = dir.path().join("stub-runtime");
    fs::write(&runtime_bin, format!("#!/bin/sh\n{script_body}\n"))
        .expect("Failed to write stub runtime");
    #[cfg(unix)]
    fs::set_permissions(&runtime_bin, fs::Permissions::from_mode(0o755))
        .expect("Failed to mark stub runtime executable");

    let db = async_db(db_path.to_str().unwrap())
        .await
        .expect("Failed to connect to async db");
    db.call(|conn| {
        initialize_db(conn).expect("Failed to initialize db");
        Ok(())
    })
    .await
    .unwrap();

    let app_config = AppConfig {
        storage_path: dir.path().display().to_string(),
        db_path: db_path.display().to_string(),
        upload_path: upload_path.display().to_string(),
        runtime_bin: runtime_bin.display().to_string(),
        default_model: String::from("deepseek-ocr"),
        runtime_timeout_secs: timeout_secs,
        max_upload_bytes: 64 * 1024,
    };
    let app_state = AppState::new(db, app_config);
    TestApp {
        app: app(Arc::new(RwLock::new(app_state))),
        _dir: dir,
    }
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Failed to read response body");
    String::from_utf8(bytes.to_vec()).expect("Response body was not utf8")
}

/// Build a multipart/form-data body with one file part plus plain form
/// fields, framed with `MULTIPART_BOUNDARY`.
pub fn multipart_body(file_name: &str, file_contents: &[u8], fields: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{MULTIPART_BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(file_contents);
    body.extend_from_slice(b"\r\n");
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{name}\"\r\n\r\n\
                 {value}\r\n"
            )
            .as_bytes(),
        );
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

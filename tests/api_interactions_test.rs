//! Integration tests for the interactions API endpoints

mod test_utils;

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    use crate::test_utils::{
        MULTIPART_BOUNDARY, body_to_string, multipart_body, test_app, test_app_with_runtime,
    };

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .uri("/api/interactions")
            .method("POST")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    /// Tests a full upload-and-process cycle against the stub runtime
    #[tokio::test]
    async fn it_processes_an_upload() {
        let fixture = test_app().await;

        let body = multipart_body(
            "scan.png",
            b"not really a png",
            &[("intent", "general-ocr")],
        );
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("STUB MODEL OUTPUT"));
        assert!(body.contains("\"intent\":\"general-ocr\""));
        assert!(body.contains("\"model\":\"deepseek-ocr\""));
        // "<|grounding|>OCR this image." is 28 characters, the stub output
        // "STUB MODEL OUTPUT" is 17
        assert!(body.contains("\"input_tokens\":7"));
        assert!(body.contains("\"output_tokens\":4"));
    }

    /// Tests that the resolved prompt reaching the runtime carries the
    /// grounding marker and the stored file path
    #[tokio::test]
    async fn it_passes_the_grounded_prompt_to_the_runtime() {
        // Echo the prompt argument back as the model output
        let fixture = test_app_with_runtime("printf '%s' \"$3\"", 10).await;

        let body = multipart_body("scan.png", b"bytes", &[("intent", "general-ocr")]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("<|grounding|>OCR this image."));
        assert!(body.contains("scan.png"));
    }

    /// Tests that description intents reach the runtime without grounding
    #[tokio::test]
    async fn it_omits_grounding_for_description_intents() {
        let fixture = test_app_with_runtime("printf '%s' \"$3\"", 10).await;

        let body = multipart_body("photo.jpg", b"bytes", &[("intent", "detailed-description")]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Describe this image in detail."));
        assert!(!body.contains("<|grounding|>"));
    }

    /// Tests a custom intent with its own prompt text
    #[tokio::test]
    async fn it_processes_a_custom_intent() {
        let fixture = test_app_with_runtime("printf '%s' \"$3\"", 10).await;

        let body = multipart_body(
            "invoice.pdf",
            b"bytes",
            &[("intent", "custom"), ("custom_prompt", "List the totals.")],
        );
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"intent\":\"custom\""));
        assert!(body.contains("<|grounding|>List the totals."));
    }

    /// Tests an unknown intent id is rejected before any processing
    #[tokio::test]
    async fn it_rejects_an_unknown_intent() {
        let fixture = test_app().await;

        let body = multipart_body("scan.png", b"bytes", &[("intent", "translate-everything")]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Unknown intent"));
    }

    /// Tests a custom intent without prompt text is rejected
    #[tokio::test]
    async fn it_rejects_a_custom_intent_without_text() {
        let fixture = test_app().await;

        let body = multipart_body("scan.png", b"bytes", &[("intent", "custom")]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Custom intent requires a non-empty prompt"));
    }

    /// Tests an unsupported model is rejected
    #[tokio::test]
    async fn it_rejects_an_unknown_model() {
        let fixture = test_app().await;

        let body = multipart_body("scan.png", b"bytes", &[("model", "gpt-oss")]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("Unknown model"));
    }

    /// Tests a missing file part is rejected
    #[tokio::test]
    async fn it_rejects_a_request_without_a_file() {
        let fixture = test_app().await;

        // Only form fields, no file part
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"intent\"\r\n\r\n\
                 general-ocr\r\n\
                 --{MULTIPART_BOUNDARY}--\r\n"
            )
            .as_bytes(),
        );
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("No file provided"));
    }

    /// Tests the upload size cap (the fixture caps files at 64KiB)
    #[tokio::test]
    async fn it_rejects_an_oversized_upload() {
        let fixture = test_app().await;

        let body = multipart_body("big.png", &vec![b'a'; 70_000], &[]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("exceeds"));
    }

    /// Tests a failing runtime surfaces its stderr and records nothing
    #[tokio::test]
    async fn it_reports_a_runtime_failure() {
        let fixture =
            test_app_with_runtime("echo 'model runtime exploded' >&2; exit 1", 10).await;

        let body = multipart_body("scan.png", b"bytes", &[]);
        let response = fixture
            .app
            .clone()
            .oneshot(upload_request(body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("model runtime exploded"));

        // No interaction is recorded for a failed attempt
        let response = fixture
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/interactions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"total_interactions\":0"));
    }

    /// Tests a hung runtime times out with a gateway timeout status
    #[tokio::test]
    async fn it_times_out_a_hung_runtime() {
        let fixture = test_app_with_runtime("sleep 5", 1).await;

        let body = multipart_body("scan.png", b"bytes", &[]);
        let response = fixture.app.oneshot(upload_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("timed out"));
    }

    /// Tests listing interactions with pagination
    #[tokio::test]
    async fn it_lists_interactions_with_pagination() {
        let fixture = test_app().await;

        let body = multipart_body("scan.png", b"bytes", &[]);
        let _response = fixture
            .app
            .clone()
            .oneshot(upload_request(body))
            .await
            .unwrap();

        let response = fixture
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/interactions?page=1&limit=5")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"page\":1"));
        assert!(body.contains("\"limit\":5"));
        assert!(body.contains("\"total_interactions\":1"));
        assert!(body.contains("STUB MODEL OUTPUT"));
    }

    /// Tests getting a single interaction by ID
    #[tokio::test]
    async fn it_gets_an_interaction_by_id() {
        let fixture = test_app().await;

        let body = multipart_body("scan.png", b"bytes", &[]);
        let response = fixture
            .app
            .clone()
            .oneshot(upload_request(body))
            .await
            .unwrap();
        let body = body_to_string(response.into_body()).await;
        let created: serde_json::Value = serde_json::from_str(&body).unwrap();
        let id = created["id"].as_str().unwrap();

        let response = fixture
            .app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/interactions/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains(id));
        assert!(body.contains("STUB MODEL OUTPUT"));
    }

    /// Tests getting a missing interaction returns 404
    #[tokio::test]
    async fn it_returns_404_for_a_missing_interaction() {
        let fixture = test_app().await;

        let response = fixture
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/interactions/no-such-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    /// Tests the intent catalog endpoint used by the UI selectors
    #[tokio::test]
    async fn it_lists_the_intent_catalog() {
        let fixture = test_app().await;

        let response = fixture
            .app
            .oneshot(
                Request::builder()
                    .uri("/api/intents")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_to_string(response.into_body()).await;
        assert!(body.contains("\"id\":\"general-ocr\""));
        assert!(body.contains("\"id\":\"custom\""));
        assert!(body.contains("deepseek-ocr"));
        assert!(body.contains("llava"));
        assert!(body.contains("moondream"));
    }
}

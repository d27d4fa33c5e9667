// Static frontend passthrough
pub mod assets;

pub mod server {
    use axum::{
        extract::{
            multipart::{MultipartError, MultipartRejection},
            DefaultBodyLimit, Multipart, State,
        },
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::{get, post},
        Json, Router,
    };
    use std::any::Any;
    use std::path::PathBuf;
    use std::sync::Arc;
    use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer};

    use super::assets;
    use crate::error::AnalyzeError;
    use crate::handlers::image_intake::SUPPORTED_FORMATS;
    use crate::handlers::{FoodAnalyzer, ImageUpload};
    use crate::models::{AnalysisResult, ApiHealth, ErrorBody, ServiceHealth};
    use crate::services::NutritionDatabase;

    pub struct AppState {
        pub analyzer: Arc<FoodAnalyzer>,
        pub nutrition: Arc<NutritionDatabase>,
        pub gemini_configured: bool,
        pub static_dir: PathBuf,
        pub max_upload_bytes: usize,
    }

    pub fn create_router(state: AppState) -> Router {
        let upload_limit = state.max_upload_bytes;

        Router::new()
            .route("/", get(assets::index_page))
            .route("/styles.css", get(assets::stylesheet))
            .route("/script.js", get(assets::script))
            .route("/api/health", get(api_health))
            .route("/health", get(health))
            .route("/analyze", post(analyze_handler))
            .layer(DefaultBodyLimit::max(upload_limit))
            .layer(CorsLayer::permissive())
            .layer(CatchPanicLayer::custom(handle_panic))
            .with_state(Arc::new(state))
    }

    impl IntoResponse for AnalyzeError {
        fn into_response(self) -> Response {
            if self.is_client_error() {
                log::warn!("⚠️ Rejected analysis request: {}", self);
            } else {
                log::error!("❌ Analysis failed: {}", self);
            }

            (self.status(), Json(ErrorBody::new(self.public_message()))).into_response()
        }
    }

    fn multipart_error(err: MultipartError, limit_bytes: usize) -> AnalyzeError {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            AnalyzeError::PayloadTooLarge { limit_bytes }
        } else if status.is_client_error() {
            AnalyzeError::MalformedUpload(err.body_text())
        } else {
            AnalyzeError::Internal(err.into())
        }
    }

    /// Pulls the `image` file field out of the form; other fields are skipped.
    async fn read_image_upload(
        mut multipart: Multipart,
        limit_bytes: usize,
    ) -> Result<ImageUpload, AnalyzeError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| multipart_error(e, limit_bytes))?
        {
            if field.name() != Some("image") {
                continue;
            }

            // A plain text field named `image` is not a file upload.
            let Some(file_name) = field.file_name().map(str::to_string) else {
                return Err(AnalyzeError::NoImage);
            };

            let bytes = field
                .bytes()
                .await
                .map_err(|e| multipart_error(e, limit_bytes))?;

            return Ok(ImageUpload { file_name, bytes });
        }

        Err(AnalyzeError::NoImage)
    }

    async fn analyze_handler(
        State(state): State<Arc<AppState>>,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Json<AnalysisResult>, AnalyzeError> {
        let multipart = multipart.map_err(|e| {
            log::debug!("Request is not multipart: {}", e);
            AnalyzeError::NoImage
        })?;

        let upload = read_image_upload(multipart, state.max_upload_bytes).await?;
        let result = state.analyzer.analyze(upload).await?;

        Ok(Json(result))
    }

    async fn api_health() -> Json<ApiHealth> {
        Json(ApiHealth {
            status: "healthy",
            message: "Food Analysis API is running",
            version: env!("CARGO_PKG_VERSION"),
        })
    }

    async fn health(State(state): State<Arc<AppState>>) -> Json<ServiceHealth> {
        Json(ServiceHealth {
            status: "healthy",
            gemini_configured: state.gemini_configured,
            supported_formats: &SUPPORTED_FORMATS,
            nutrition_database_size: state.nutrition.len(),
        })
    }

    fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
        let detail = if let Some(s) = err.downcast_ref::<String>() {
            s.clone()
        } else if let Some(s) = err.downcast_ref::<&str>() {
            s.to_string()
        } else {
            "unknown panic".to_string()
        };
        log::error!("💥 Handler panicked: {}", detail);

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Internal server error. Please try again.")),
        )
            .into_response()
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::handlers::food_analyzer::tests::{png_bytes, StubAI};
        use axum::{
            body::{to_bytes, Body},
            http::{header, Request},
        };
        use serde_json::Value;
        use std::sync::atomic::Ordering;
        use tower::ServiceExt;

        const BOUNDARY: &str = "food-lens-test-boundary";

        struct TestApp {
            router: Router,
            ai: Arc<StubAI>,
            static_dir: tempfile::TempDir,
        }

        fn test_app(ai: StubAI, max_upload_bytes: usize) -> TestApp {
            let ai = Arc::new(ai);
            let nutrition = Arc::new(NutritionDatabase::builtin());
            let static_dir = tempfile::tempdir().unwrap();

            let state = AppState {
                analyzer: Arc::new(FoodAnalyzer::new(ai.clone(), nutrition.clone())),
                nutrition,
                gemini_configured: true,
                static_dir: static_dir.path().to_path_buf(),
                max_upload_bytes,
            };

            TestApp {
                router: create_router(state),
                ai,
                static_dir,
            }
        }

        fn app(ai: StubAI) -> TestApp {
            test_app(ai, 16 * 1024 * 1024)
        }

        enum FormPart<'a> {
            Text(&'a str, &'a str),
            File(&'a str, &'a str, &'a [u8]),
        }

        fn analyze_request(parts: &[FormPart]) -> Request<Body> {
            let mut body = Vec::new();
            for part in parts {
                body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
                match part {
                    FormPart::Text(name, value) => {
                        body.extend_from_slice(
                            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                                .as_bytes(),
                        );
                        body.extend_from_slice(value.as_bytes());
                    }
                    FormPart::File(name, file_name, data) => {
                        body.extend_from_slice(
                            format!(
                                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                                 Content-Type: application/octet-stream\r\n\r\n",
                                name, file_name
                            )
                            .as_bytes(),
                        );
                        body.extend_from_slice(data);
                    }
                }
                body.extend_from_slice(b"\r\n");
            }
            body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

            Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap()
        }

        fn get(uri: &str) -> Request<Body> {
            Request::builder().uri(uri).body(Body::empty()).unwrap()
        }

        async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
            let response = router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, body.to_vec())
        }

        async fn send_json(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
            let (status, body) = send(router, request).await;
            (status, serde_json::from_slice(&body).unwrap())
        }

        #[tokio::test]
        async fn test_api_health() {
            let app = app(StubAI::failing());
            let (status, body) = send_json(&app.router, get("/api/health")).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["status"], "healthy");
            assert_eq!(body["message"], "Food Analysis API is running");
            assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        }

        #[tokio::test]
        async fn test_detailed_health() {
            let app = app(StubAI::failing());
            let (status, body) = send_json(&app.router, get("/health")).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["gemini_configured"], true);
            assert_eq!(body["nutrition_database_size"], 49);
            assert_eq!(body["supported_formats"][5], "WebP");
        }

        #[tokio::test]
        async fn test_analyze_success() {
            let app = app(StubAI::replying(
                "Grilled chicken with steamed broccoli and brown rice.",
            ));
            let png = png_bytes();
            let request = analyze_request(&[
                FormPart::Text("note", "lunch"),
                FormPart::File("image", "lunch.png", &png),
            ]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(
                body["foods"],
                serde_json::json!(["rice", "chicken", "broccoli"])
            );
            assert_eq!(body["nutrition"]["chicken"]["calories"], 165);
            assert_eq!(body["nutrition"]["rice"]["protein"], "2.7g");
            assert_eq!(body["confidence"], "84.0");
            assert!(body["health_tip"]
                .as_str()
                .unwrap()
                .contains("eat the rainbow"));
            assert!(body["analysis_time"].as_str().unwrap().parse::<f64>().is_ok());
            assert_eq!(app.ai.calls.load(Ordering::SeqCst), 1);
        }

        #[tokio::test]
        async fn test_nutrition_keeps_extraction_order() {
            let app = app(StubAI::replying("Rice with dal and a boiled egg"));
            let png = png_bytes();
            let request = analyze_request(&[FormPart::File("image", "meal.jpg", &png)]);
            let (status, body) = send(&app.router, request).await;

            assert_eq!(status, StatusCode::OK);
            let text = String::from_utf8(body).unwrap();
            let rice = text.find("\"rice\":{").unwrap();
            let dal = text.find("\"dal\":{").unwrap();
            let egg = text.find("\"egg\":{").unwrap();
            assert!(rice < dal && dal < egg);
        }

        #[tokio::test]
        async fn test_missing_image_field() {
            let app = app(StubAI::replying("rice"));
            let request = analyze_request(&[FormPart::Text("note", "no photo today")]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "No image file provided");
        }

        #[tokio::test]
        async fn test_image_sent_as_text_field() {
            let app = app(StubAI::replying("rice"));
            let request = analyze_request(&[FormPart::Text("image", "not a file")]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "No image file provided");
        }

        #[tokio::test]
        async fn test_non_multipart_request() {
            let app = app(StubAI::replying("rice"));
            let request = Request::builder()
                .method("POST")
                .uri("/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap();
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "No image file provided");
        }

        #[tokio::test]
        async fn test_invalid_file_type() {
            let app = app(StubAI::replying("rice"));
            let png = png_bytes();
            let request = analyze_request(&[FormPart::File("image", "photo.txt", &png)]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert!(body["error"]
                .as_str()
                .unwrap()
                .starts_with("Invalid file type."));
            assert_eq!(app.ai.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_undecodable_image() {
            let app = app(StubAI::replying("rice"));
            let request =
                analyze_request(&[FormPart::File("image", "meal.jpeg", b"GIF89a-but-not-really")]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(
                body["error"],
                "Error processing image. Please ensure the file is a valid image."
            );
        }

        #[tokio::test]
        async fn test_model_failure_hides_detail() {
            let app = app(StubAI::failing());
            let png = png_bytes();
            let request = analyze_request(&[FormPart::File("image", "meal.png", &png)]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body["success"], false);
            assert_eq!(body["error"], "Error analyzing image. Please try again.");
        }

        #[tokio::test]
        async fn test_upload_too_large() {
            let app = test_app(StubAI::replying("rice"), 1024 * 1024);
            let oversized = vec![0u8; 2 * 1024 * 1024];
            let request = analyze_request(&[FormPart::File("image", "huge.png", &oversized)]);
            let (status, body) = send_json(&app.router, request).await;

            assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
            assert_eq!(
                body["error"],
                "File too large. Please upload an image smaller than 1MB."
            );
            assert_eq!(app.ai.calls.load(Ordering::SeqCst), 0);
        }

        #[tokio::test]
        async fn test_index_missing() {
            let app = app(StubAI::failing());
            let (status, body) = send_json(&app.router, get("/")).await;

            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body["error"], "Frontend files not found");
            assert_eq!(body["api_status"], "healthy");
        }

        #[tokio::test]
        async fn test_static_assets_missing() {
            let app = app(StubAI::failing());

            let (status, body) = send(&app.router, get("/styles.css")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, b"/* styles.css not found */");

            let (status, body) = send(&app.router, get("/script.js")).await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert_eq!(body, b"// script.js not found");
        }

        #[tokio::test]
        async fn test_static_assets_served() {
            let app = app(StubAI::failing());
            let dir = app.static_dir.path();
            std::fs::write(dir.join("index.html"), "<h1>Food Lens</h1>").unwrap();
            std::fs::write(dir.join("styles.css"), "body { margin: 0; }").unwrap();

            let response = app.router.clone().oneshot(get("/")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert!(response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html"));

            let response = app.router.clone().oneshot(get("/styles.css")).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"body { margin: 0; }");
        }
    }
}

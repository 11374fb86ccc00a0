//! Axum application setup.

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::state::AppState;

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        .route("/dataset", get(handlers::get_dataset))
        .route("/list-images", get(handlers::list_images))
        .route("/upload", post(handlers::upload_images))
        .route("/delete-all-images", delete(handlers::delete_all_images))
        .fallback(handlers::not_found);

    let images = ServeDir::new(state.store.root());
    let body_limit = match state.config.body_limit {
        Some(max) => DefaultBodyLimit::max(max),
        None => DefaultBodyLimit::disable(),
    };

    Router::new()
        .nest("/api", api_routes)
        .nest_service("/images", images)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server and run until Ctrl+C.
pub async fn run_server(state: AppState) -> Result<(), Box<dyn std::error::Error>> {
    let addr = state.config.addr;
    let app = create_router(state.clone());

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        address = %addr,
        images = %state.store.root().display(),
        "image server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received Ctrl+C, shutting down");
            }
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::state::ServerConfig;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tempfile::TempDir;
    use tower::util::ServiceExt;

    const BOUNDARY: &str = "tierlist-test-boundary";

    fn setup() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            images_dir: dir.path().join("images"),
            dataset: Some("test-ds".to_string()),
            ..ServerConfig::default()
        };
        (dir, AppState::new(config).unwrap())
    }

    fn request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    /// Multipart body with one part per `(field, file name, content type, contents)`.
    fn multipart(parts: &[(&str, &str, &str, &str)]) -> Request<Body> {
        let mut body = Vec::new();
        for (field, name, content_type, contents) in parts {
            body.extend_from_slice(
                format!(
                    "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                    BOUNDARY, field, name, content_type
                )
                .as_bytes(),
            );
            body.extend_from_slice(contents.as_bytes());
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/upload")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dataset() {
        let (_dir, state) = setup();
        let response = create_router(state)
            .oneshot(request("GET", "/api/dataset"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["dataset"], "test-ds");
    }

    #[tokio::test]
    async fn test_list_filters_and_sorts() {
        let (_dir, state) = setup();
        let root = state.store.root().to_path_buf();
        std::fs::write(root.join("2-b.png"), b"png").unwrap();
        std::fs::write(root.join("1-a.JPG"), b"jpg").unwrap();
        std::fs::write(root.join("notes.txt"), b"txt").unwrap();

        let response = create_router(state)
            .oneshot(request("GET", "/api/list-images"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json(response).await,
            serde_json::json!(["/images/1-a.JPG", "/images/2-b.png"])
        );
    }

    #[tokio::test]
    async fn test_upload_then_serve() {
        let (_dir, state) = setup();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(multipart(&[
                ("images", "cat.jpg", "image/jpeg", "cat"),
                ("images", "dog.png", "image/png", "dog"),
            ]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json(response).await;
        assert_eq!(body["message"], "Images uploaded successfully");
        let files = body["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        let first = files[0].as_str().unwrap();
        assert!(first.ends_with("-cat.jpg"));

        let response = app
            .oneshot(request("GET", &format!("/images/{}", first)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"cat");
    }

    #[tokio::test]
    async fn test_upload_rejects_bad_type() {
        let (_dir, state) = setup();
        let root = state.store.root().to_path_buf();

        let response = create_router(state)
            .oneshot(multipart(&[
                ("images", "ok.jpg", "image/jpeg", "ok"),
                ("images", "evil.svg", "image/svg+xml", "<svg/>"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"], "upload_rejected");
        assert_eq!(body["file"], "evil.svg");
        assert_eq!(std::fs::read_dir(root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_upload_without_files() {
        let (_dir, state) = setup();
        let response = create_router(state)
            .oneshot(multipart(&[("other", "a.jpg", "image/jpeg", "a")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_upload_over_size_cap() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            images_dir: dir.path().join("images"),
            policy: tierlist::store::UploadPolicy::new().with_max_file_bytes(4),
            ..ServerConfig::default()
        };
        let state = AppState::new(config).unwrap();

        let response = create_router(state)
            .oneshot(multipart(&[("images", "big.jpg", "image/jpeg", "too big")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"], "upload_rejected");
    }

    #[tokio::test]
    async fn test_batch_larger_than_default_body_limit() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            images_dir: dir.path().join("images"),
            policy: tierlist::store::UploadPolicy::new().with_max_file_bytes(1024 * 1024),
            ..ServerConfig::default()
        };
        assert_eq!(config.body_limit, None);
        let root = config.images_dir.clone();
        let state = AppState::new(config).unwrap();

        // Five files at the per-file cap, well past axum's 2 MiB default.
        let contents = "x".repeat(1024 * 1024);
        let names: Vec<String> = (0..5).map(|i| format!("photo{}.jpg", i)).collect();
        let parts: Vec<(&str, &str, &str, &str)> = names
            .iter()
            .map(|name| ("images", name.as_str(), "image/jpeg", contents.as_str()))
            .collect();

        let response = create_router(state).oneshot(multipart(&parts)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json(response).await["files"].as_array().unwrap().len(), 5);
        assert_eq!(std::fs::read_dir(root).unwrap().count(), 5);
    }

    #[tokio::test]
    async fn test_oversize_file_in_batch_is_named() {
        let dir = TempDir::new().unwrap();
        let config = ServerConfig {
            images_dir: dir.path().join("images"),
            policy: tierlist::store::UploadPolicy::new().with_max_file_bytes(1024),
            ..ServerConfig::default()
        };
        let root = config.images_dir.clone();
        let state = AppState::new(config).unwrap();

        let small = "s".repeat(1024);
        let large = "l".repeat(64 * 1024);
        let response = create_router(state)
            .oneshot(multipart(&[
                ("images", "ok.jpg", "image/jpeg", small.as_str()),
                ("images", "huge.png", "image/png", large.as_str()),
                ("images", "after.jpg", "image/jpeg", small.as_str()),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json(response).await;
        assert_eq!(body["error"], "upload_rejected");
        assert_eq!(body["file"], "huge.png");
        assert_eq!(std::fs::read_dir(root).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let (_dir, state) = setup();
        let root = state.store.root().to_path_buf();
        std::fs::write(root.join("1-a.jpg"), b"a").unwrap();
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(request("DELETE", "/api/delete-all-images"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json(response).await["message"],
            "All images deleted successfully"
        );

        let response = app
            .oneshot(request("GET", "/api/list-images"))
            .await
            .unwrap();
        assert_eq!(json(response).await, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_unknown_api_route() {
        let (_dir, state) = setup();
        let response = create_router(state)
            .oneshot(request("GET", "/api/nope"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json(response).await["error"], "not_found");
    }

    /// Run the router on an ephemeral port in a background thread.
    fn spawn_server(state: AppState) -> String {
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, create_router(state)).await.unwrap();
            });
        });
        format!("http://{}", rx.recv().unwrap())
    }

    #[test]
    fn test_http_store_against_server() {
        use tierlist::persistence::MemoryBlobStore;
        use tierlist::store::HttpStore;
        use tierlist::{ObjectStore, Session, SessionConfig, Tier, TierlistError, Upload};

        let (_dir, state) = setup();
        let store = HttpStore::new(spawn_server(state)).unwrap();

        assert_eq!(store.dataset().unwrap(), "test-ds");
        assert!(store.list().unwrap().is_empty());

        let mut session = Session::open(store.clone(), MemoryBlobStore::new(), SessionConfig::new());
        assert_eq!(session.namespace(), "test-ds");

        let stored = session
            .upload(&[
                Upload::new("a.jpg", "image/jpeg", b"a".to_vec()),
                Upload::new("b.webp", "image/webp", b"b".to_vec()),
            ])
            .unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored[0].starts_with("/images/"));
        assert_eq!(store.list().unwrap(), stored);

        session.assign(Tier::new(4).unwrap()).unwrap();
        assert_eq!(session.current_image().image(), Some(stored[1].as_str()));

        let rejected = store.store(&Upload::new("doc.pdf", "application/pdf", b"%PDF".to_vec()));
        match rejected {
            Err(TierlistError::UploadRejected { file, .. }) => assert_eq!(file, "doc.pdf"),
            other => panic!("expected rejection, got {:?}", other),
        }

        let report = session.reset(true);
        assert!(report.images_deleted);
        assert_eq!(report.catalog, 0);
        assert!(store.list().unwrap().is_empty());
    }
}

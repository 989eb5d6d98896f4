use std::sync::Arc;

use aide::openapi::OpenApi;
use axum::{body::Body, http::Request, response::Response, Extension, Router};
use portfolio_backend::{
    access_guard::{password, AccessGuard},
    gallery::GalleryService,
    jwt::JwtManager,
    media_storage::mock::MockMediaGateway,
    routes,
    testimonials::TestimonialService,
    types::Environment,
};
use portfolio_storage::{AdminCredential, RecordStore};
use tempfile::TempDir;
use tower::ServiceExt;

use super::MultipartPart;

/// Password of the admin account created for every test
pub const ADMIN_PASSWORD: &str = "test-admin-password";
/// Secret tokens are signed with in tests
pub const JWT_SECRET: &[u8] = b"integration-test-secret";

/// Setup tracing for tests
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Router wired to a temporary store document and a mock media gateway
#[allow(dead_code)]
pub struct TestSetup {
    pub router: Router,
    pub environment: Environment,
    pub record_store: Arc<RecordStore>,
    pub media_gateway: Arc<MockMediaGateway>,
    pub jwt_manager: JwtManager,
    // Keep the temporary directory alive for the duration of the test
    dir: TempDir,
}

impl TestSetup {
    pub async fn new() -> Self {
        Self::with(Environment::Development, MockMediaGateway::new()).await
    }

    pub async fn with_gateway(media_gateway: MockMediaGateway) -> Self {
        Self::with(Environment::Development, media_gateway).await
    }

    pub async fn with_environment(environment: Environment) -> Self {
        Self::with(environment, MockMediaGateway::new()).await
    }

    async fn with(environment: Environment, media_gateway: MockMediaGateway) -> Self {
        setup_test_env();

        let dir = tempfile::tempdir().unwrap();
        let record_store = Arc::new(RecordStore::new(dir.path().join("database.json")));
        record_store
            .initialize(AdminCredential::new(
                password::hash_password(ADMIN_PASSWORD).unwrap(),
            ))
            .await
            .unwrap();

        let media_gateway = Arc::new(media_gateway);
        let gallery = Arc::new(
            GalleryService::new(record_store.clone(), media_gateway.clone(), "portfolio")
                .with_staging_dir(dir.path().join("uploads")),
        );
        let testimonials = Arc::new(TestimonialService::new(record_store.clone()));

        let jwt_manager = JwtManager::new(JWT_SECRET);
        let access_guard = Arc::new(AccessGuard::new(jwt_manager.clone(), record_store.clone()));

        let mut openapi = OpenApi::default();
        let router = routes::handler()
            .finish_api(&mut openapi)
            .layer(Extension(openapi))
            .layer(Extension(environment.clone()))
            .layer(Extension(gallery))
            .layer(Extension(testimonials))
            .layer(Extension(access_guard));

        Self {
            router,
            environment,
            record_store,
            media_gateway,
            jwt_manager,
            dir,
        }
    }

    /// Directory incoming uploads are staged in
    pub fn staging_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    /// Token signed with the test secret
    pub fn admin_token(&self) -> String {
        self.jwt_manager.issue_token("admin").unwrap().token
    }

    pub async fn send_get_request(
        &self,
        route: &str,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let request = Request::builder()
            .uri(route)
            .method("GET")
            .body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_post_request(
        &self,
        route: &str,
        payload: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", "application/json");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::from(payload.to_string()))?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_delete_request(
        &self,
        route: &str,
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut builder = Request::builder().uri(route).method("DELETE");
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::empty())?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }

    pub async fn send_multipart_request(
        &self,
        route: &str,
        parts: &[MultipartPart<'_>],
        token: Option<&str>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let (content_type, body) = super::multipart_body(parts);

        let mut builder = Request::builder()
            .uri(route)
            .method("POST")
            .header("Content-Type", content_type);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }

        let request = builder.body(Body::from(body))?;
        let response = self.router.clone().oneshot(request).await?;
        Ok(response)
    }
}

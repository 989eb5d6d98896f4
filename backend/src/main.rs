use std::sync::Arc;

use anyhow::Context;
use portfolio_backend::{
    access_guard::{password, AccessGuard},
    gallery::GalleryService,
    jwt::JwtManager,
    media_storage::{CloudinaryClient, DisabledMediaGateway, MediaGateway},
    server,
    testimonials::TestimonialService,
    types::Environment,
};
use portfolio_storage::{AdminCredential, RecordStore};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let environment = Environment::from_env();

    // JSON logs for staging/production, human readable for development
    if environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    let record_store = Arc::new(RecordStore::new(environment.database_path()));
    if !record_store.exists().await? {
        let initial_password = environment.initial_admin_password();
        let password_hash =
            tokio::task::spawn_blocking(move || password::hash_password(&initial_password))
                .await?
                .map_err(|e| anyhow::anyhow!("Failed to hash the admin password: {e}"))?;

        record_store
            .initialize(AdminCredential::new(password_hash))
            .await?;
        tracing::info!(path = %record_store.path().display(), "Created the store document");
    }

    let media_gateway: Arc<dyn MediaGateway> = match environment.media_host_config() {
        Some(config) => {
            tracing::info!(cloud_name = %config.cloud_name, "Media host configured");
            Arc::new(CloudinaryClient::new(config).context("Failed to build the media client")?)
        }
        None => {
            tracing::warn!("Media host is not configured, image uploads are disabled");
            Arc::new(DisabledMediaGateway)
        }
    };

    let gallery = Arc::new(
        GalleryService::new(
            record_store.clone(),
            media_gateway,
            environment.media_folder_prefix(),
        )
        .with_staging_dir(environment.upload_temp_dir()),
    );
    let testimonials = Arc::new(TestimonialService::new(record_store.clone()));

    let jwt_manager = JwtManager::new(environment.jwt_secret().as_bytes());
    let access_guard = Arc::new(AccessGuard::new(jwt_manager, record_store));

    server::start(environment, gallery, testimonials, access_guard).await
}

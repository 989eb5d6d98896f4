//! Bulk upload of local image folders to the gallery
//!
//! Reads `images-tattoo/` and `images-mirror/` by default, uploads every image to
//! the media host and records it in the store document.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use portfolio_backend::{
    bulk_import::{BulkImporter, ImportFolder},
    gallery::GalleryService,
    media_storage::CloudinaryClient,
    types::Environment,
};
use portfolio_storage::{Category, RecordStore};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "bulk-upload")]
#[command(version, about = "Upload local image folders to the portfolio gallery")]
struct Args {
    /// Folder with tattoo images.
    #[arg(long, default_value = "images-tattoo")]
    tattoo_dir: PathBuf,

    /// Folder with engraved mirror images.
    #[arg(long, default_value = "images-mirror")]
    mirror_dir: PathBuf,

    /// Pause between two uploads, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    delay_ms: u64,

    /// Store document to add the images to.
    #[arg(long, env = "DATABASE_PATH", default_value = "data/database.json")]
    database: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let environment = Environment::from_env();
    let config = environment.media_host_config().context(
        "The media host is not configured, set CLOUDINARY_CLOUD_NAME, \
         CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET",
    )?;
    info!(cloud_name = %config.cloud_name, "Media host configured");

    let record_store = Arc::new(RecordStore::new(&args.database));
    let media_gateway = Arc::new(CloudinaryClient::new(config)?);
    let gallery = Arc::new(GalleryService::new(
        record_store,
        media_gateway,
        environment.media_folder_prefix(),
    ));

    let folders = [
        ImportFolder {
            category: Category::Tattoo,
            path: args.tattoo_dir,
        },
        ImportFolder {
            category: Category::Mirror,
            path: args.mirror_dir,
        },
    ];

    let importer = BulkImporter::new(gallery, Duration::from_millis(args.delay_ms));
    let summary = importer.run(&folders).await?;

    info!(
        uploaded = summary.uploaded,
        failed = summary.failed,
        skipped_folders = summary.skipped_folders,
        "Bulk upload finished"
    );

    Ok(())
}

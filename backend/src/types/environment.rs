//! Environment configuration for different deployment stages

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::media_storage::CloudinaryConfig;

/// Development-only signing secret, never used outside `development`
const DEVELOPMENT_JWT_SECRET: &str = "development-only-jwt-secret";
/// Development-only initial admin password, never used outside `development`
const DEVELOPMENT_ADMIN_PASSWORD: &str = "admin123";

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Local development
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }

    /// Whether to show API docs
    #[must_use]
    pub const fn show_api_docs(&self) -> bool {
        matches!(self, Self::Development | Self::Staging)
    }

    /// Secret used to sign admin tokens
    ///
    /// # Panics
    ///
    /// Panics outside of development if `JWT_SECRET` is not set
    #[must_use]
    pub fn jwt_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => non_empty_var("JWT_SECRET")
                .expect("JWT_SECRET environment variable is not set"),
            Self::Development => non_empty_var("JWT_SECRET").unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET is not set, using the development secret");
                DEVELOPMENT_JWT_SECRET.to_string()
            }),
        }
    }

    /// Password hashed into the admin credential when the store is first created
    ///
    /// # Panics
    ///
    /// Panics outside of development if `ADMIN_PASSWORD` is not set
    #[must_use]
    pub fn initial_admin_password(&self) -> String {
        match self {
            Self::Production | Self::Staging => non_empty_var("ADMIN_PASSWORD")
                .expect("ADMIN_PASSWORD environment variable is not set"),
            Self::Development => non_empty_var("ADMIN_PASSWORD").unwrap_or_else(|| {
                tracing::warn!("ADMIN_PASSWORD is not set, using the development password");
                DEVELOPMENT_ADMIN_PASSWORD.to_string()
            }),
        }
    }

    /// Path of the JSON store document
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        non_empty_var("DATABASE_PATH")
            .map_or_else(|| PathBuf::from("data/database.json"), PathBuf::from)
    }

    /// Directory where uploads are staged before being sent to the media host
    #[must_use]
    pub fn upload_temp_dir(&self) -> PathBuf {
        non_empty_var("UPLOAD_TEMP_DIR").map_or_else(
            || env::temp_dir().join("portfolio-uploads"),
            PathBuf::from,
        )
    }

    /// Media host credentials, `None` when any of them is missing
    #[must_use]
    pub fn media_host_config(&self) -> Option<CloudinaryConfig> {
        Some(CloudinaryConfig {
            cloud_name: non_empty_var("CLOUDINARY_CLOUD_NAME")?,
            api_key: non_empty_var("CLOUDINARY_API_KEY")?,
            api_secret: non_empty_var("CLOUDINARY_API_SECRET")?,
            timeout: self.media_timeout(),
        })
    }

    /// Remote folder under which gallery images are stored
    #[must_use]
    pub fn media_folder_prefix(&self) -> String {
        non_empty_var("MEDIA_FOLDER_PREFIX").unwrap_or_else(|| "portfolio".to_string())
    }

    /// Timeout applied to every media host call
    #[must_use]
    pub fn media_timeout(&self) -> Duration {
        secs_var("MEDIA_TIMEOUT_SECS").unwrap_or(Duration::from_secs(30))
    }

    /// Timeout applied to a whole HTTP request
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        secs_var("REQUEST_TIMEOUT_SECS").unwrap_or(Duration::from_secs(60))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

fn secs_var(key: &str) -> Option<Duration> {
    non_empty_var(key)
        .and_then(|val| val.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

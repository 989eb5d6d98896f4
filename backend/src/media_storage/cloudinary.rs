//! Cloudinary implementation of the media gateway
//!
//! Uses the signed upload API: every request carries the API key, a timestamp and a
//! SHA-1 signature over the alphabetically sorted parameters followed by the API
//! secret. See <https://cloudinary.com/documentation/authentication_signatures>.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    multipart::{Form, Part},
    Client,
};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, instrument};

use super::{MediaError, MediaGateway, MediaResult, UploadOptions, UploadedMedia, QUALITY};

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";

/// Credentials and limits for the Cloudinary account
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryConfig {
    /// Account (cloud) name
    pub cloud_name: String,
    /// API key
    pub api_key: String,
    /// API secret, only used to sign requests
    pub api_secret: String,
    /// Timeout applied to every call
    pub timeout: Duration,
}

impl std::fmt::Debug for CloudinaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// HTTP client for the Cloudinary image API
pub struct CloudinaryClient {
    config: CloudinaryConfig,
    api_base: String,
    http_client: Client,
}

impl CloudinaryClient {
    /// Creates a new Cloudinary client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: CloudinaryConfig) -> Result<Self, reqwest::Error> {
        let http_client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            config,
            api_base: DEFAULT_API_BASE.to_string(),
            http_client,
        })
    }

    /// Overrides the API base URL
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Transformation string for the fixed upload policy
    fn transformation(options: &UploadOptions) -> String {
        format!(
            "c_limit,h_{dim},w_{dim}/q_{quality}",
            dim = options.max_dimension,
            quality = QUALITY
        )
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/{}/image/{action}",
            self.api_base.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Signs `params`, returning the hex SHA-1 signature
    fn sign(&self, params: &[(&'static str, String)]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(string_to_sign(params).as_bytes());
        hasher.update(self.config.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Builds the signed form for `params`
    fn signed_form(&self, params: Vec<(&'static str, String)>) -> Form {
        let signature = self.sign(&params);

        params
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature)
    }
}

/// Joins parameters as `k=v` pairs sorted by key and separated by `&`
fn string_to_sign(params: &[(&'static str, String)]) -> String {
    let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
    sorted.sort_by_key(|(k, _)| *k);
    sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&body).map_or_else(
        |_| format!("status {status}"),
        |parsed| format!("status {status}: {}", parsed.error.message),
    )
}

#[async_trait]
impl MediaGateway for CloudinaryClient {
    #[instrument(skip(self, bytes), fields(len = bytes.len()))]
    async fn upload(&self, bytes: Vec<u8>, options: &UploadOptions) -> MediaResult<UploadedMedia> {
        let params = vec![
            ("folder", options.target_folder.clone()),
            ("format", options.format.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
            ("transformation", Self::transformation(options)),
        ];
        let form = self
            .signed_form(params)
            .part("file", Part::bytes(bytes).file_name("upload"));

        let response = self
            .http_client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::UploadRejected(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::UploadRejected(error_message(response).await));
        }

        let uploaded = response
            .json::<UploadResponse>()
            .await
            .map_err(|e| MediaError::UploadRejected(format!("unexpected response: {e}")))?;

        debug!(media_id = %uploaded.public_id, "Asset stored at media host");

        Ok(UploadedMedia {
            media_id: uploaded.public_id,
            url: uploaded.secure_url,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, media_id: &str) -> MediaResult<()> {
        let params = vec![
            ("public_id", media_id.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];

        let response = self
            .http_client
            .post(self.endpoint("destroy"))
            .multipart(self.signed_form(params))
            .send()
            .await
            .map_err(|e| MediaError::RemoteDeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MediaError::RemoteDeleteFailed(error_message(response).await));
        }

        let destroyed = response
            .json::<DestroyResponse>()
            .await
            .map_err(|e| MediaError::RemoteDeleteFailed(format!("unexpected response: {e}")))?;

        // Already gone counts as deleted
        match destroyed.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(MediaError::RemoteDeleteFailed(format!(
                "unexpected result `{other}` for {media_id}"
            ))),
        }
    }
}

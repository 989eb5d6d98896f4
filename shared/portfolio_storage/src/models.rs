//! Records persisted in the store document

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

/// Username embedded in every admin credential and token
pub const ADMIN_USERNAME: &str = "admin";

/// Gallery category of an image
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Tattoo work
    #[default]
    Tattoo,
    /// Engraved mirrors
    Mirror,
}

impl Category {
    /// Every category, in display order
    pub const ALL: [Self; 2] = [Self::Tattoo, Self::Mirror];
}

/// Singleton admin credential
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminCredential {
    /// Fixed admin username
    pub username: String,
    /// Argon2 PHC string of the admin password
    #[serde(alias = "password")]
    pub password_hash: String,
}

impl AdminCredential {
    /// Creates the admin credential from an already hashed password
    #[must_use]
    pub fn new(password_hash: String) -> Self {
        Self {
            username: ADMIN_USERNAME.to_string(),
            password_hash,
        }
    }
}

/// Image published in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Unique, time-ordered record id
    pub id: String,
    /// Opaque handle of the asset at the media host
    #[serde(default, alias = "cloudinaryId")]
    pub media_id: String,
    /// Public URL of the asset
    pub url: String,
    /// Gallery category
    #[serde(default)]
    pub category: Category,
    /// Optional title, empty when not provided
    #[serde(default)]
    pub title: String,
    /// Optional description, empty when not provided
    #[serde(default)]
    pub description: String,
    /// Upload timestamp
    pub uploaded_at: DateTime<Utc>,
}

/// Client testimonial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialRecord {
    /// Unique, time-ordered record id
    pub id: String,
    /// Name of the client
    pub client_name: String,
    /// Service the client received
    pub service: String,
    /// Rating between 1 and 5
    pub rating: u8,
    /// Testimonial body
    pub text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// The single document backing the whole store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreDocument {
    /// Gallery images, in insertion order
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    /// Testimonials, in insertion order. Older documents lack this key.
    #[serde(default)]
    pub testimonials: Vec<TestimonialRecord>,
    /// Admin credential
    pub admin: AdminCredential,
}

impl StoreDocument {
    /// Creates an empty document with the given admin credential
    #[must_use]
    pub const fn new(admin: AdminCredential) -> Self {
        Self {
            images: Vec::new(),
            testimonials: Vec::new(),
            admin,
        }
    }
}

/// Generates a unique record id that sorts by creation time
#[must_use]
pub fn new_record_id() -> String {
    Uuid::now_v7().to_string()
}

//! Portfolio backend service
//!
//! Serves the public gallery and testimonials of a tattoo and mirror engraving
//! studio, and the admin surface that manages them.

#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(missing_docs)]

/// Admin login and token verification
pub mod access_guard;

/// Bulk import of local image folders
pub mod bulk_import;

/// Gallery images kept in sync with the media host
pub mod gallery;

/// Admin token signing and validation
pub mod jwt;

/// Remote image hosting
pub mod media_storage;

/// Request middleware
pub mod middleware;

/// HTTP routes
pub mod routes;

/// HTTP server
pub mod server;

/// Client testimonials
pub mod testimonials;

/// Shared API types
pub mod types;

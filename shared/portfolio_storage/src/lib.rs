//! Persistent storage for the portfolio backend
//!
//! The whole gallery lives in a single JSON document holding the admin credential,
//! the image records and the client testimonials. This crate owns the document model
//! and the read-modify-write cycle over the backing file.

pub mod models;
pub mod record_store;

pub use models::{
    new_record_id, AdminCredential, Category, ImageRecord, StoreDocument, TestimonialRecord,
};
pub use record_store::{RecordStore, RecordStoreError, RecordStoreResult};

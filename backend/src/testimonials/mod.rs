//! Testimonial service

mod error;

use std::sync::Arc;

use chrono::Utc;
use portfolio_storage::{new_record_id, RecordStore, TestimonialRecord};
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, instrument};
use validator::Validate;

pub use error::{TestimonialError, TestimonialResult};

use crate::types::validation_message;

/// Testimonial as submitted by a client or the admin
#[derive(Debug, Clone, Deserialize, JsonSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTestimonial {
    /// Name of the client
    #[validate(length(min = 1, message = "Client name is required"))]
    pub client_name: String,
    /// Service the client received
    #[validate(length(min = 1, message = "Service is required"))]
    pub service: String,
    /// Rating from 1 to 5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    /// Testimonial text, 20 to 500 characters
    #[validate(length(
        min = 20,
        max = 500,
        message = "Text must be between 20 and 500 characters"
    ))]
    pub text: String,
}

impl NewTestimonial {
    fn trimmed(self) -> Self {
        Self {
            client_name: self.client_name.trim().to_string(),
            service: self.service.trim().to_string(),
            rating: self.rating,
            text: self.text.trim().to_string(),
        }
    }
}

/// Stores and retrieves client testimonials
pub struct TestimonialService {
    record_store: Arc<RecordStore>,
}

impl TestimonialService {
    /// Creates a new testimonial service
    #[must_use]
    pub const fn new(record_store: Arc<RecordStore>) -> Self {
        Self { record_store }
    }

    /// Lists testimonials, most recent first
    ///
    /// # Errors
    ///
    /// Returns `TestimonialError::Store` if the record store cannot be read
    pub async fn list(&self) -> TestimonialResult<Vec<TestimonialRecord>> {
        let mut testimonials = self.record_store.load().await?.testimonials;
        testimonials.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(testimonials)
    }

    /// Stores a testimonial sent through the public form
    ///
    /// Surrounding whitespace is trimmed from every text field before validation.
    ///
    /// # Errors
    ///
    /// - `TestimonialError::Validation` - a field breaks its rule
    /// - `TestimonialError::Store` - the record could not be saved
    #[instrument(skip_all)]
    pub async fn submit_public(
        &self,
        testimonial: NewTestimonial,
    ) -> TestimonialResult<TestimonialRecord> {
        self.store(testimonial.trimmed()).await
    }

    /// Stores a testimonial entered by the admin, as given
    ///
    /// # Errors
    ///
    /// - `TestimonialError::Validation` - a field breaks its rule
    /// - `TestimonialError::Store` - the record could not be saved
    #[instrument(skip_all)]
    pub async fn submit_admin(
        &self,
        testimonial: NewTestimonial,
    ) -> TestimonialResult<TestimonialRecord> {
        self.store(testimonial).await
    }

    /// Deletes a testimonial
    ///
    /// # Errors
    ///
    /// - `TestimonialError::NotFound` - no testimonial has this id, nothing is changed
    /// - `TestimonialError::Store` - the record store could not be updated
    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> TestimonialResult<()> {
        self.record_store
            .try_update(|document| {
                let index = document
                    .testimonials
                    .iter()
                    .position(|testimonial| testimonial.id == id)
                    .ok_or_else(|| TestimonialError::NotFound(id.to_string()))?;
                document.testimonials.remove(index);
                Ok::<_, TestimonialError>(())
            })
            .await?;

        info!("Testimonial deleted");
        Ok(())
    }

    async fn store(&self, testimonial: NewTestimonial) -> TestimonialResult<TestimonialRecord> {
        testimonial
            .validate()
            .map_err(|errors| TestimonialError::Validation(validation_message(&errors)))?;

        let rating = u8::try_from(testimonial.rating)
            .map_err(|_| TestimonialError::Validation("Rating must be between 1 and 5".into()))?;

        let record = TestimonialRecord {
            id: new_record_id(),
            client_name: testimonial.client_name,
            service: testimonial.service,
            rating,
            text: testimonial.text,
            created_at: Utc::now(),
        };

        let pushed = record.clone();
        self.record_store
            .update(move |document| document.testimonials.push(pushed))
            .await?;

        info!(id = %record.id, rating, "Testimonial stored");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use portfolio_storage::AdminCredential;
    use tempfile::TempDir;

    use super::*;

    async fn setup() -> (TestimonialService, Arc<RecordStore>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::new(dir.path().join("database.json")));
        store
            .initialize(AdminCredential::new("hash".to_string()))
            .await
            .unwrap();
        (TestimonialService::new(store.clone()), store, dir)
    }

    fn testimonial(rating: i64, text: &str) -> NewTestimonial {
        NewTestimonial {
            client_name: "Ana".to_string(),
            service: "Fine line tattoo".to_string(),
            rating,
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_text_length_bounds() {
        let (service, _store, _dir) = setup().await;

        for (len, accepted) in [(19, false), (20, true), (500, true), (501, false)] {
            let result = service.submit_admin(testimonial(5, &"a".repeat(len))).await;
            assert_eq!(result.is_ok(), accepted, "Text of {len} characters");
        }
    }

    #[tokio::test]
    async fn test_text_length_counts_characters() {
        let (service, _store, _dir) = setup().await;

        // 20 characters, 40 bytes
        let text = "é".repeat(20);
        assert!(service.submit_admin(testimonial(4, &text)).await.is_ok());
    }

    #[tokio::test]
    async fn test_rating_bounds() {
        let (service, _store, _dir) = setup().await;
        let text = "Beautiful work, very happy with it";

        for (rating, accepted) in [(0, false), (1, true), (5, true), (6, false), (-3, false)] {
            let result = service.submit_admin(testimonial(rating, text)).await;
            assert_eq!(result.is_ok(), accepted, "Rating {rating}");
        }
    }

    #[tokio::test]
    async fn test_public_submission_is_trimmed_before_validation() {
        let (service, _store, _dir) = setup().await;

        let padded = NewTestimonial {
            client_name: "  Ana  ".to_string(),
            service: " Mirror engraving ".to_string(),
            rating: 5,
            text: format!("   {}   ", "a".repeat(20)),
        };
        let record = service.submit_public(padded).await.unwrap();
        assert_eq!(record.client_name, "Ana");
        assert_eq!(record.service, "Mirror engraving");
        assert_eq!(record.text.chars().count(), 20);

        // Padding does not count towards the minimum length
        let short = testimonial(5, &format!("{}      ", "a".repeat(19)));
        assert!(matches!(
            service.submit_public(short).await,
            Err(TestimonialError::Validation(_))
        ));

        let blank_name = NewTestimonial {
            client_name: "   ".to_string(),
            ..testimonial(5, &"a".repeat(30))
        };
        assert!(matches!(
            service.submit_public(blank_name).await,
            Err(TestimonialError::Validation(message)) if message == "Client name is required"
        ));
    }

    #[tokio::test]
    async fn test_admin_submission_is_not_trimmed() {
        let (service, _store, _dir) = setup().await;

        let record = service
            .submit_admin(NewTestimonial {
                client_name: " Ana ".to_string(),
                ..testimonial(3, &"a".repeat(25))
            })
            .await
            .unwrap();
        assert_eq!(record.client_name, " Ana ");
    }

    #[tokio::test]
    async fn test_list_most_recent_first() {
        let (service, store, _dir) = setup().await;
        let first = service
            .submit_admin(testimonial(5, &"a".repeat(20)))
            .await
            .unwrap();
        let second = service
            .submit_admin(testimonial(4, &"b".repeat(20)))
            .await
            .unwrap();

        // Pin timestamps so ordering does not depend on clock resolution
        let base = Utc::now();
        store
            .update(|document| {
                for testimonial in &mut document.testimonials {
                    testimonial.created_at = if testimonial.id == first.id {
                        base - Duration::hours(1)
                    } else {
                        base
                    };
                }
            })
            .await
            .unwrap();

        let listed: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|testimonial| testimonial.id)
            .collect();
        assert_eq!(listed, vec![second.id, first.id]);
    }

    #[tokio::test]
    async fn test_delete() {
        let (service, store, _dir) = setup().await;
        let record = service
            .submit_admin(testimonial(5, &"a".repeat(20)))
            .await
            .unwrap();

        let missing = service.delete("missing").await;
        assert!(matches!(missing, Err(TestimonialError::NotFound(_))));
        assert_eq!(store.load().await.unwrap().testimonials.len(), 1);

        service.delete(&record.id).await.unwrap();
        assert!(service.list().await.unwrap().is_empty());
    }
}

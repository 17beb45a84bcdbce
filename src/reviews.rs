// src/reviews.rs
//! Review capture and persistence.
//!
//! Reviews are kept as one JSON array under a fixed storage key, newest
//! first. Submissions are append-only: no editing, deletion or dedup.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::pacing::Pacer;
use crate::storage::KeyValueStore;
use crate::types::{Review, ReviewInput};

pub const REVIEWS_STORAGE_KEY: &str = "kickresume-reviews";

const SHOWCASE_LIMIT: usize = 6;
const DEFAULT_ROLE: &str = "Professional";
const DEFAULT_RATING: u8 = 5;
const PLACEHOLDER_PHOTO_RANGE: u64 = 1_000_000;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Name is required")]
    MissingName,
    #[error("Comment is required")]
    MissingComment,
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl ReviewError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Storage(_) => "STORAGE_ERROR",
            _ => "INVALID_REVIEW",
        }
    }
}

// ===== Repository =====

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Stored reviews, newest first
    async fn load(&self) -> Result<Vec<Review>>;
    /// Put a review in front of the stored sequence
    async fn append(&self, review: Review) -> Result<()>;
}

pub struct StoredReviews<S> {
    store: S,
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> StoredReviews<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl<S: KeyValueStore> ReviewRepository for StoredReviews<S> {
    async fn load(&self) -> Result<Vec<Review>> {
        let Some(raw) = self.store.get(REVIEWS_STORAGE_KEY).await? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Review>>(&raw) {
            Ok(reviews) => Ok(reviews),
            Err(e) => {
                warn!("Discarding malformed stored reviews: {}", e);
                Ok(Vec::new())
            }
        }
    }

    async fn append(&self, review: Review) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut reviews = self.load().await?;
        reviews.insert(0, review);

        let json = serde_json::to_string(&reviews).context("Failed to serialize reviews")?;
        self.store.set(REVIEWS_STORAGE_KEY, &json).await
    }
}

// ===== Service =====

pub struct ReviewService {
    repository: Arc<dyn ReviewRepository>,
    pacer: Pacer,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn ReviewRepository>, pacer: Pacer) -> Self {
        Self { repository, pacer }
    }

    pub async fn submit(&self, input: ReviewInput) -> Result<Review, ReviewError> {
        let review = build_review(input)?;

        self.pacer.pace().await;
        self.repository.append(review.clone()).await?;

        info!("Stored review {} ({} stars)", review.id, review.rating);
        Ok(review)
    }

    pub async fn list(&self) -> Result<Vec<Review>> {
        self.repository.load().await
    }

    /// Up to six newest reviews, or the built-in testimonials when none are stored
    pub async fn showcase(&self) -> Result<Vec<Review>> {
        let stored = self.repository.load().await?;
        if stored.is_empty() {
            return Ok(default_reviews());
        }
        Ok(stored.into_iter().take(SHOWCASE_LIMIT).collect())
    }

    pub async fn average_rating(&self) -> Result<Option<f64>> {
        Ok(average_rating(&self.repository.load().await?))
    }
}

pub fn average_rating(reviews: &[Review]) -> Option<f64> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
    Some(f64::from(total) / reviews.len() as f64)
}

/// Validate the form input and turn it into a dated review
pub fn build_review(input: ReviewInput) -> Result<Review, ReviewError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(ReviewError::MissingName);
    }
    let comment = input.comment.trim();
    if comment.is_empty() {
        return Err(ReviewError::MissingComment);
    }
    let rating = input.rating.unwrap_or(DEFAULT_RATING);
    if !(1..=5).contains(&rating) {
        return Err(ReviewError::InvalidRating(rating));
    }

    let role = match input.role.trim() {
        "" => DEFAULT_ROLE.to_string(),
        role => role.to_string(),
    };
    let avatar = input
        .photo
        .filter(|p| !p.is_empty())
        .unwrap_or_else(placeholder_avatar);

    Ok(Review {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        role,
        rating,
        comment: comment.to_string(),
        date: timestamp(),
        avatar: Some(avatar),
    })
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Random stock photo reference
fn placeholder_avatar() -> String {
    let bits = Uuid::new_v4().as_u128();
    let photo = (bits as u64) % PLACEHOLDER_PHOTO_RANGE;
    let variant = ((bits >> 64) as u64) % PLACEHOLDER_PHOTO_RANGE;
    format!(
        "https://images.pexels.com/photos/{}/pexels-photo-{}.jpeg?auto=compress&cs=tinysrgb&w=150&h=150&fit=crop",
        photo, variant
    )
}

fn default_reviews() -> Vec<Review> {
    let date = timestamp();
    let review = |id: &str, name: &str, role: &str, comment: &str, photo: u32| Review {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        rating: 5,
        comment: comment.to_string(),
        date: date.clone(),
        avatar: Some(format!(
            "https://images.pexels.com/photos/{0}/pexels-photo-{0}.jpeg?auto=compress&cs=tinysrgb&w=100&h=100&fit=crop",
            photo
        )),
    };

    vec![
        review(
            "1",
            "Sarah Chen",
            "Software Engineer",
            "I got 3 interview calls within a week of using KickResume. The AI suggestions were spot-on and it's completely free!",
            415829,
        ),
        review(
            "2",
            "Michael Rodriguez",
            "Marketing Manager",
            "The templates are beautiful and professional. Landed my dream job at a Fortune 500 company! Can't believe it's free.",
            1222271,
        ),
        review(
            "3",
            "Emily Johnson",
            "Recent Graduate",
            "As a new grad with no budget, this free tool was a lifesaver. The photo upload feature made my resume stand out!",
            733872,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryStore, SqliteStore};

    fn input(name: &str, comment: &str) -> ReviewInput {
        ReviewInput {
            name: name.to_string(),
            comment: comment.to_string(),
            ..Default::default()
        }
    }

    fn service() -> ReviewService {
        ReviewService::new(
            Arc::new(StoredReviews::new(MemoryStore::new())),
            Pacer::immediate(),
        )
    }

    #[test]
    fn test_build_review_defaults() {
        let review = build_review(input("Dana", "Great tool")).unwrap();

        assert_eq!(review.rating, 5);
        assert_eq!(review.role, "Professional");
        assert!(review.date.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&review.date).is_ok());

        let avatar = review.avatar.unwrap();
        assert!(avatar.starts_with("https://images.pexels.com/photos/"));
        assert!(avatar.ends_with("w=150&h=150&fit=crop"));
    }

    #[test]
    fn test_build_review_keeps_supplied_photo_and_role() {
        let review = build_review(ReviewInput {
            role: "Designer".to_string(),
            rating: Some(3),
            photo: Some("data:image/png;base64,AAAA".to_string()),
            ..input("Dana", "Nice")
        })
        .unwrap();

        assert_eq!(review.role, "Designer");
        assert_eq!(review.rating, 3);
        assert_eq!(review.avatar.as_deref(), Some("data:image/png;base64,AAAA"));
    }

    #[test]
    fn test_build_review_validation() {
        assert!(matches!(
            build_review(input(" ", "Nice")),
            Err(ReviewError::MissingName)
        ));
        assert!(matches!(
            build_review(input("Dana", "")),
            Err(ReviewError::MissingComment)
        ));

        let err = build_review(ReviewInput {
            rating: Some(0),
            ..input("Dana", "Nice")
        })
        .unwrap_err();
        assert!(matches!(err, ReviewError::InvalidRating(0)));
        assert_eq!(err.code(), "INVALID_REVIEW");

        assert!(build_review(ReviewInput {
            rating: Some(6),
            ..input("Dana", "Nice")
        })
        .is_err());
    }

    #[tokio::test]
    async fn test_reviews_are_stored_newest_first_and_survive_reload() {
        let store = SqliteStore::in_memory().await.unwrap();
        let service = ReviewService::new(
            Arc::new(StoredReviews::new(store.clone())),
            Pacer::immediate(),
        );

        for name in ["first", "second", "third"] {
            service.submit(input(name, "comment")).await.unwrap();
        }

        let reloaded = StoredReviews::new(store);
        let names: Vec<String> = reloaded
            .load()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["third", "second", "first"]);
    }

    #[tokio::test]
    async fn test_rejected_review_is_not_stored() {
        let service = service();
        assert!(service.submit(input("", "comment")).await.is_err());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_storage_is_treated_as_empty() {
        let store = MemoryStore::new();
        store.set(REVIEWS_STORAGE_KEY, "{not json").await.unwrap();
        let repo = StoredReviews::new(store);

        assert!(repo.load().await.unwrap().is_empty());

        repo.append(build_review(input("Dana", "Recovered")).unwrap())
            .await
            .unwrap();
        let reviews = repo.load().await.unwrap();
        assert_eq!(reviews.len(), 1);
        assert_eq!(reviews[0].comment, "Recovered");
    }

    #[tokio::test]
    async fn test_showcase_falls_back_to_defaults() {
        let service = service();

        let defaults = service.showcase().await.unwrap();
        let names: Vec<&str> = defaults.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Sarah Chen", "Michael Rodriguez", "Emily Johnson"]);
        assert_eq!(service.average_rating().await.unwrap(), None);

        for i in 0..8 {
            service
                .submit(ReviewInput {
                    rating: Some(if i % 2 == 0 { 4 } else { 5 }),
                    ..input(&format!("user{}", i), "ok")
                })
                .await
                .unwrap();
        }

        let showcase = service.showcase().await.unwrap();
        assert_eq!(showcase.len(), 6);
        assert_eq!(showcase[0].name, "user7");
        assert_eq!(service.average_rating().await.unwrap(), Some(4.5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_waits_for_pacing() {
        let service = ReviewService::new(
            Arc::new(StoredReviews::new(MemoryStore::new())),
            Pacer::from_millis(1000),
        );
        let start = tokio::time::Instant::now();
        service.submit(input("Dana", "Paced")).await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(1000));
    }
}

// src/types/review.rs
use serde::{Deserialize, Serialize};

/// A testimonial left after finishing a resume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub name: String,
    pub role: String,
    /// 1 to 5 stars
    pub rating: u8,
    pub comment: String,
    /// RFC 3339 timestamp
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// What the review form submits
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewInput {
    pub name: String,
    pub role: String,
    /// Unset means five stars
    pub rating: Option<u8>,
    pub comment: String,
    pub photo: Option<String>,
}

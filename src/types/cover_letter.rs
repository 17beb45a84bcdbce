// src/types/cover_letter.rs
use serde::{Deserialize, Serialize};

/// Job context typed in next to the resume when asking for a cover letter.
/// Empty strings mean "not provided".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoverLetterInputs {
    pub company_name: String,
    pub job_title: String,
    pub hiring_manager_name: String,
    pub job_description: String,
    pub why_interested: String,
    pub key_achievement: String,
}

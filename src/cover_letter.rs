// src/cover_letter.rs
//! Cover letter generation from a resume document and job inputs.
//!
//! The letter is a fixed text template. Missing resume data falls back to
//! generic phrases so the output never contains empty slots.

use thiserror::Error;
use tracing::{debug, info};

use crate::pacing::Pacer;
use crate::render::BULLET;
use crate::types::{CoverLetterInputs, ResumeDocument};

const EXPERIENCE_HIGHLIGHTS: usize = 2;
const SKILLS_MENTIONED: usize = 3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoverLetterError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

impl CoverLetterError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
        }
    }
}

/// Company name and job title must be filled in before a letter can be produced
pub fn validate(inputs: &CoverLetterInputs) -> Result<(), CoverLetterError> {
    if inputs.company_name.trim().is_empty() {
        return Err(CoverLetterError::MissingField("company_name"));
    }
    if inputs.job_title.trim().is_empty() {
        return Err(CoverLetterError::MissingField("job_title"));
    }
    Ok(())
}

pub fn generate(
    document: &ResumeDocument,
    inputs: &CoverLetterInputs,
) -> Result<String, CoverLetterError> {
    validate(inputs)?;

    let info = &document.personal_info;
    let first = document.experience.first();
    let first_title = first
        .map(|e| e.job_title.as_str())
        .filter(|t| !t.is_empty());
    let first_company = first
        .map(|e| e.company.as_str())
        .filter(|c| !c.is_empty());

    let mut paragraphs = Vec::new();

    paragraphs.push(format!(
        "Dear {},",
        or_default(&inputs.hiring_manager_name, "Hiring Manager")
    ));

    paragraphs.push(format!(
        "I am writing to express my strong interest in the {} position at {}. With my background in {} and proven track record of success, I am excited about the opportunity to contribute to your team.",
        inputs.job_title,
        inputs.company_name,
        first_title.unwrap_or("professional experience")
    ));

    if !inputs.why_interested.trim().is_empty() {
        paragraphs.push(format!(
            "What particularly draws me to {} is {}. This aligns perfectly with my career goals and values.",
            inputs.company_name, inputs.why_interested
        ));
    }

    let mut body = format!(
        "In my previous role as {} at {}, I successfully {}.",
        first_title.unwrap_or("a professional"),
        first_company.unwrap_or("my previous company"),
        or_default(
            &inputs.key_achievement,
            "delivered exceptional results and exceeded performance expectations"
        )
    );
    if !document.experience.is_empty() {
        body.push_str(" My experience includes:");
        paragraphs.push(body);
        paragraphs.push(experience_highlights(document));
    } else {
        paragraphs.push(body);
    }

    let skills: Vec<&str> = document
        .skills
        .iter()
        .take(SKILLS_MENTIONED)
        .map(|s| s.name.as_str())
        .filter(|name| !name.is_empty())
        .collect();
    let skills = if skills.is_empty() {
        "a broad range of relevant areas".to_string()
    } else {
        skills.join(", ")
    };
    let opportunity = if inputs.job_description.trim().is_empty() {
        "contribute to your team's continued success".to_string()
    } else {
        format!(
            "apply my expertise to {}",
            inputs.job_description.to_lowercase()
        )
    };
    paragraphs.push(format!(
        "My technical skills in {} make me well-suited for this role. I am particularly excited about the opportunity to {}.",
        skills, opportunity
    ));

    paragraphs.push(format!(
        "I would welcome the opportunity to discuss how my experience and passion can contribute to {}'s continued success. Thank you for considering my application. I look forward to hearing from you soon.",
        inputs.company_name
    ));

    paragraphs.push(format!("Sincerely,\n{}", info.display_name()));

    let mut contact = format!(
        "---\nContact Information:\nEmail: {}\nPhone: {}",
        info.email, info.phone
    );
    if !info.linkedin.is_empty() {
        contact.push_str(&format!("\nLinkedIn: {}", info.linkedin));
    }
    paragraphs.push(contact);

    debug!(
        "Generated cover letter for {} at {}",
        inputs.job_title, inputs.company_name
    );
    Ok(paragraphs.join("\n\n"))
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// First description line of each leading experience, bullet glyph stripped
fn experience_highlights(document: &ResumeDocument) -> String {
    document
        .experience
        .iter()
        .take(EXPERIENCE_HIGHLIGHTS)
        .map(|exp| {
            let first_line = exp
                .description
                .split('\n')
                .next()
                .unwrap_or("")
                .replacen(BULLET, "", 1);
            let first_line = first_line.trim();
            if first_line.is_empty() {
                format!("{} Contributed to team success and organizational goals", BULLET)
            } else {
                format!("{} {}", BULLET, first_line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Generation with the visible processing delay
#[derive(Debug, Clone, Default)]
pub struct CoverLetterService {
    pacer: Pacer,
}

impl CoverLetterService {
    pub fn new(pacer: Pacer) -> Self {
        Self { pacer }
    }

    /// Validation happens up front so a rejected request returns without waiting
    pub async fn generate(
        &self,
        document: &ResumeDocument,
        inputs: &CoverLetterInputs,
    ) -> Result<String, CoverLetterError> {
        validate(inputs)?;
        self.pacer.pace().await;
        let letter = generate(document, inputs)?;
        info!(
            "Cover letter ready for {} ({} chars)",
            inputs.company_name,
            letter.len()
        );
        Ok(letter)
    }
}
